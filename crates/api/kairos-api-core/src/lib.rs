//! kairos-api-core: value model shared by curves and the entities they drive.
//!
//! A [`ValueType`] names one kind of animatable value (number, vectors, ...).
//! A [`Value`] is a runtime instance of exactly one type. Conversion between
//! types is described in [`coercion`].

pub mod coercion;
pub mod value;
pub mod value_type;

pub use coercion::ConversionError;
pub use value::Value;
pub use value_type::ValueType;
