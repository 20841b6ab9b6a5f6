// API route handlers, one module per resource.

pub mod check;
pub mod model;
