//! Public commands exposed to the CRUD layer

pub mod meetings;
