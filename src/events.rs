use std::fmt;
use std::sync::mpsc;

use log::info;

use crate::model::{BarberId, ClientId};

/// Lo único que se ve desde afuera del coordinador: una transición por cada
/// llegada y una por cada corte terminado. `BarberIdle` es la "unidad libre"
/// del problema clásico; acá los servidores son barberos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopEvent {
    /// Había un barbero libre y el cliente pasó directo.
    AssignedImmediately { client: ClientId, barber: BarberId },
    /// El cliente se sentó en la sala; `position` empieza en 1.
    Queued { client: ClientId, position: usize },
    /// Sala llena, el cliente se va.
    Rejected { client: ClientId },
    /// Un barbero terminó y tomó al primero de la sala; quedan `remaining`.
    AssignedFromQueue {
        client: ClientId,
        barber: BarberId,
        remaining: usize,
    },
    /// Un barbero terminó y no había nadie esperando: vuelve a los libres y se duerme.
    BarberIdle { barber: BarberId },
}

impl ShopEvent {
    /// El par barbero/cliente que hay que poner a trabajar, si el evento lo implica.
    pub fn assignment(&self) -> Option<(BarberId, ClientId)> {
        match *self {
            ShopEvent::AssignedImmediately { client, barber }
            | ShopEvent::AssignedFromQueue { client, barber, .. } => Some((barber, client)),
            _ => None,
        }
    }
}

impl fmt::Display for ShopEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShopEvent::AssignedImmediately { client, barber } => {
                write!(f, "{} pasa directo con el {}", client, barber)
            }
            ShopEvent::Queued { client, position } => {
                write!(f, "{} espera en la sala ({})", client, position)
            }
            ShopEvent::Rejected { client } => {
                write!(f, "No hay lugar para el {}, se va", client)
            }
            ShopEvent::AssignedFromQueue {
                client,
                barber,
                remaining,
            } => write!(
                f,
                "{} toma al {} de la sala ({})",
                barber, client, remaining
            ),
            ShopEvent::BarberIdle { barber } => write!(f, "{} se duerme", barber),
        }
    }
}

/// Destino de los eventos del coordinador: un logger, un test, otro hilo...
pub trait EventSink: Send + 'static {
    fn emit(&self, event: ShopEvent);
}

/// Narra cada transición por el log, como lo hacía la versión de consola.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: ShopEvent) {
        info!("[Barbería] {}", event);
    }
}

// si el receptor ya no está nadie está mirando, el coordinador sigue igual
impl EventSink for futures_channel::mpsc::UnboundedSender<ShopEvent> {
    fn emit(&self, event: ShopEvent) {
        let _ = self.unbounded_send(event);
    }
}

impl EventSink for mpsc::Sender<ShopEvent> {
    fn emit(&self, event: ShopEvent) {
        let _ = self.send(event);
    }
}
