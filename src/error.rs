use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::{BarberId, ClientId};

/// Valores de configuración con los que la barbería no puede abrir.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("la barbería necesita al menos un barbero")]
    NoBarbers,
    #[error("el tiempo de corte debe ser mayor a cero")]
    ZeroCuttingTime,
    #[error("rango de llegadas vacío: [{min}, {max}) ms")]
    EmptyGapRange { min: u64, max: u64 },
    #[error("no se pudo leer {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("configuración inválida: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Fallas de infraestructura al hablar con el coordinador. Un rechazo por sala
/// llena nunca es un error.
#[derive(Debug, Error)]
pub enum ShopError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("la barbería dejó de responder: {0}")]
    Mailbox(#[from] actix::MailboxError),
    #[error("el canal de la barbería está cerrado")]
    ChannelClosed,
    #[error("el hilo de la barbería terminó con pánico")]
    CoordinatorPanicked,
}

/// Estados que el coordinador nunca debería alcanzar. Si aparece alguno es un
/// bug de coordinación.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("{barber} está libre mientras {waiting} clientes esperan")]
    IdleBarberWithWaitingClients { barber: BarberId, waiting: usize },
    #[error("la sala tiene {waiting} clientes y solo {seats} sillas")]
    HallOverflow { waiting: usize, seats: usize },
    #[error("{0} está libre y atendiendo a la vez")]
    BarberFreeAndBusy(BarberId),
    #[error("{0} está esperando y siendo atendido a la vez")]
    ClientWaitingAndServed(ClientId),
    #[error("llegaron {arrivals} clientes pero solo se cuentan {accounted}")]
    LostClients { arrivals: u64, accounted: u64 },
}
