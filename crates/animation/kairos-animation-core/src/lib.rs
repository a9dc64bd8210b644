//! Kairos Animation Core (engine-agnostic)
//!
//! Time-varying values as [`Curve`]s, the interval algebra used to describe
//! where a curve is constant, and the [`Updater`]/[`Binder`] machinery that
//! pushes curve values into host objects only when they can have changed.
//!
//! Everything here is single-threaded: curves are shared as `Rc<dyn Curve>`
//! and one [`Updater`] drives its binders synchronously from the host's frame
//! loop.

pub mod binder;
pub mod binding_block;
pub mod config;
pub mod curve;
pub mod curves;
pub mod error;
pub mod ids;
pub mod interp;
pub mod interval;
pub mod invariance;
pub mod time;
pub mod updater;

// Re-exports for hosts
pub use binder::{Binder, Setter};
pub use binding_block::{BindingBlock, DescendantUnbinder, EasyBindingBlock, Parameter};
pub use config::UpdaterConfig;
pub use curve::{Curve, ValueChangeListener, ValueChangeListeners};
pub use curves::{ComboVectorCurve, ConstantCurve, KFLinearCurve, KFStepCurve, KeyFrame};
pub use error::{AnimationError, Result};
pub use ids::{BinderId, ListenerId};
pub use interval::{Interval, UNIVERSAL};
pub use invariance::Invariance;
pub use time::{Time, MAX_TIME, MIN_TIME};
pub use updater::Updater;
pub use kairos_api_core::{Value, ValueType};
