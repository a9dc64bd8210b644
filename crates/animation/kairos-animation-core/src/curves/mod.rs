//! Concrete curve implementations.

pub mod combo_vector;
pub mod constant;
pub mod key_frames;
pub mod kf_linear;
pub mod kf_step;

pub use combo_vector::ComboVectorCurve;
pub use constant::ConstantCurve;
pub use key_frames::KeyFrame;
pub use kf_linear::KFLinearCurve;
pub use kf_step::KFStepCurve;
