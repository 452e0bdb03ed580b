// Domain layer - Data model and pure logic
pub mod auxiliary;
pub mod event;
pub mod packet;
pub mod sensor;
