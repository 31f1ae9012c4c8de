use thiserror::Error;

/// Errors that can occur while configuring or running a simulation.
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Excel error: {0}")]
    Excel(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A diameter fell outside every band of a cost table. Always fatal.
    #[error("Cost lookup error: DBH {dbh} cm falls outside the {table} cost bands")]
    CostLookup { table: String, dbh: f64 },
}

impl From<calamine::Error> for SimulationError {
    fn from(e: calamine::Error) -> Self {
        SimulationError::Excel(e.to_string())
    }
}

impl From<calamine::XlsxError> for SimulationError {
    fn from(e: calamine::XlsxError) -> Self {
        SimulationError::Excel(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for SimulationError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        SimulationError::Excel(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = SimulationError::from(io_err);
        let msg = err.to_string();
        assert!(msg.contains("IO error"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_excel_error_display() {
        let err = SimulationError::Excel("bad sheet".to_string());
        assert_eq!(err.to_string(), "Excel error: bad sheet");
    }

    #[test]
    fn test_parse_error_display() {
        let err = SimulationError::ParseError("unknown policy".to_string());
        assert_eq!(err.to_string(), "Parse error: unknown policy");
    }

    #[test]
    fn test_validation_error_display() {
        let err = SimulationError::ValidationError("horizon must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Validation error: horizon must be positive"
        );
    }

    #[test]
    fn test_cost_lookup_display() {
        let err = SimulationError::CostLookup {
            table: "removal".to_string(),
            dbh: -1.0,
        };
        assert_eq!(
            err.to_string(),
            "Cost lookup error: DBH -1 cm falls outside the removal cost bands"
        );
    }

    #[test]
    fn test_json_error_from_conversion() {
        let result: Result<serde_json::Value, _> = serde_json::from_str("not valid json{{{");
        let json_err = result.unwrap_err();
        let err: SimulationError = json_err.into();
        assert!(matches!(err, SimulationError::Json(_)));
        assert!(err.to_string().contains("JSON error"));
    }

    #[test]
    fn test_toml_error_from_conversion() {
        let result: Result<toml::Value, _> = toml::from_str("horizon = = 3");
        let err: SimulationError = result.unwrap_err().into();
        assert!(matches!(err, SimulationError::Toml(_)));
    }

    #[test]
    fn test_error_is_debug() {
        let err = SimulationError::ParseError("test".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("ParseError"));
    }
}
