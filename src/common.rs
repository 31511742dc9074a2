use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcError {
    #[error("{0} is not a prime modulus greater than 2")]
    InvalidModulus(i64),
    #[error("point ({x},{y}) is not on the curve")]
    InvalidPoint { x: i64, y: i64 },
    #[error("division by zero in the field")]
    DivisionByZero,
}
