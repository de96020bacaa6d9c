use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculusError {
    #[error("No closed-form antiderivative found for {0}")]
    NoClosedForm(String),
    #[error("Cannot differentiate function '{0}'")]
    UnsupportedFunction(String),
}
