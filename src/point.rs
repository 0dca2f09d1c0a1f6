/// A plane survey point. `x` is easting, `y` is northing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2d {
    pub x: f64,
    pub y: f64,
    /// Feature code from the field book (e.g. "FENCE", "TREE").
    pub code: Option<String>,
}

impl Point2d {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, code: None }
    }

    pub fn with_code(x: f64, y: f64, code: impl Into<String>) -> Self {
        Self {
            x,
            y,
            code: Some(code.into()),
        }
    }

    /// Horizontal distance to another point.
    pub fn distance_to(&self, other: &Point2d) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// A point with a reduced level `z`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub code: Option<String>,
}

impl Point3d {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            code: None,
        }
    }

    pub fn with_code(x: f64, y: f64, z: f64, code: impl Into<String>) -> Self {
        Self {
            x,
            y,
            z,
            code: Some(code.into()),
        }
    }

    /// Drop the level, keeping the feature code.
    pub fn to_2d(&self) -> Point2d {
        Point2d {
            x: self.x,
            y: self.y,
            code: self.code.clone(),
        }
    }
}

impl From<&Point3d> for Point2d {
    fn from(p: &Point3d) -> Self {
        p.to_2d()
    }
}
