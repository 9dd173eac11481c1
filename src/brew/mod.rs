pub mod cauldron;
pub mod melody;
pub mod transport;
