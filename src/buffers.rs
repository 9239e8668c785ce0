//! This module contains the buffers bound to parameter markers of prepared statements, together
//! with the description of their memory layout.

mod description;
mod indicator;
mod parameter_buffer;

pub use self::{
    description::BufferKind,
    indicator::Indicator,
    parameter_buffer::{BindParameterArgs, ParameterBuffer},
};
