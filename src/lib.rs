//! Land surveying computations: angle notation, plane coordinate geometry,
//! the Gauss-Krüger projection and two-point resection.

pub mod angle;
pub mod error;
pub mod plane;
pub mod point;
pub mod proj;
pub mod resection;

pub use angle::{Angle, BearingConvention, QuadrantBearing};
pub use error::{AngleError, ProjError, ResectionError, SurveyError};
pub use point::{Point2d, Point3d};
pub use proj::gauss_kruger::{gauss_kruger, inverse_gauss_kruger, GaussKruger, Geodetic, ProjectedResult};
pub use proj::model::ProjectionModel;
pub use resection::{resect_two_point, ResectionConfig, ResectionResult, Station, TwoPointResection};
