// El barbero dormilón: barberos fijos, clientes que llegan al azar y una sala
// de espera con sillas contadas. Un solo coordinador decide todo; se puede
// correr con actores (actors) o con hilos y un canal (channels).

pub mod actors;
pub mod arrivals;
pub mod channels;
pub mod config;
pub mod error;
pub mod events;
pub mod model;
pub mod shop;

pub use config::{Cli, ShopConfig};
pub use error::{ConfigError, InvariantViolation, ShopError};
pub use events::{EventSink, LogSink, ShopEvent};
pub use model::{BarberId, ClientId};
pub use shop::{ShopSnapshot, ShopState, ShopStats};
