/// Domain layer: repository kinds, names, configuration and run results
pub mod entities;
pub mod value_objects;
