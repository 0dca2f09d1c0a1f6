use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurveyError {
    #[error("Angle error: {0}")]
    Angle(#[from] AngleError),

    #[error("Projection error: {0}")]
    Projection(#[from] ProjError),

    #[error("Resection error: {0}")]
    Resection(#[from] ResectionError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AngleError {
    #[error("Invalid angle notation: {0}")]
    InvalidNotation(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Angle conversion failed: {0}")]
    Angle(#[from] AngleError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResectionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Singular system: {0}")]
    SingularSystem(String),

    #[error("No convergence after {iterations} iterations (last estimate {x:.4}, {y:.4})")]
    NonConvergence { iterations: usize, x: f64, y: f64 },

    #[error("Angle conversion failed: {0}")]
    Angle(#[from] AngleError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::Angle;
    use crate::proj::gauss_kruger::gauss_kruger;
    use crate::proj::model::ProjectionModel;

    fn project_flinders_peak(cm: Angle) -> Result<f64, SurveyError> {
        let r = gauss_kruger(
            Angle::Dms(-37.570372030),
            Angle::Dms(144.252952442),
            cm,
            &ProjectionModel::mga(),
        )?;
        Ok(r.easting)
    }

    #[test]
    fn test_errors_lift_into_survey_error() {
        assert!(project_flinders_peak(Angle::Dms(147.0)).is_ok());
        let err = project_flinders_peak(Angle::Dms(147.7)).unwrap_err();
        assert!(matches!(
            err,
            SurveyError::Projection(ProjError::Angle(AngleError::InvalidNotation(_)))
        ));
        assert!(err.to_string().starts_with("Projection error: Angle conversion failed"));
    }

    #[test]
    fn test_non_convergence_message() {
        let err = SurveyError::from(ResectionError::NonConvergence {
            iterations: 20,
            x: 1.0,
            y: 2.0,
        });
        assert_eq!(
            err.to_string(),
            "Resection error: No convergence after 20 iterations (last estimate 1.0000, 2.0000)"
        );
    }
}
