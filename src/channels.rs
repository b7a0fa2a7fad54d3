// La barbería con hilos: el coordinador es el único que lee el canal, así que
// llegadas y cortes terminados se procesan de a uno en el orden en que entraron.
// Cada corte es un hilo que duerme y manda un solo mensaje de vuelta.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::debug;

use crate::config::ShopConfig;
use crate::error::ShopError;
use crate::events::EventSink;
use crate::model::{BarberId, ClientId};
use crate::shop::{ShopSnapshot, ShopState};

// solo el coordinador y los cortes en curso ven este enum completo; afuera
// nada más se pueden mandar llegadas (ArrivalSender)
#[derive(Debug)]
pub(crate) enum ShopMessage {
    Arrived(ClientId),
    Finished(BarberId),
    // el coordinador deja de leer y devuelve su estado
    Close,
}

/// Extremo de escritura que solo deja entrar clientes.
///
/// ```compile_fail
/// use barberia::channels::ShopMessage;
/// ```
#[derive(Debug, Clone)]
pub struct ArrivalSender {
    sender: Sender<ShopMessage>,
}

impl ArrivalSender {
    pub(crate) fn new(sender: Sender<ShopMessage>) -> Self {
        ArrivalSender { sender }
    }

    pub fn arrive(&self, client: ClientId) -> Result<(), ShopError> {
        self.sender
            .send(ShopMessage::Arrived(client))
            .map_err(|_| ShopError::ChannelClosed)
    }
}

/// Extremo de la barbería que queda del lado de quien la abrió. Si se suelta
/// sin llamar a `close` la barbería cierra igual.
pub struct ShopHandle {
    sender: Sender<ShopMessage>,
    coordinator: Option<JoinHandle<ShopSnapshot>>,
}

impl ShopHandle {
    pub fn spawn(config: &ShopConfig, events: impl EventSink) -> Self {
        let (sender, inbox) = mpsc::channel();
        let state = ShopState::new(config.barbers, config.hall_seats);
        let cutting_time = config.cutting_time();
        let outbox = sender.clone();
        let coordinator = thread::spawn(move || run_shop(state, inbox, outbox, cutting_time, events));
        ShopHandle {
            sender,
            coordinator: Some(coordinator),
        }
    }

    // para el generador de llegadas, o cualquier otro productor de clientes
    pub fn sender(&self) -> ArrivalSender {
        ArrivalSender::new(self.sender.clone())
    }

    pub fn arrive(&self, client: ClientId) -> Result<(), ShopError> {
        self.sender
            .send(ShopMessage::Arrived(client))
            .map_err(|_| ShopError::ChannelClosed)
    }

    /// Cierra la barbería y espera al coordinador. Los cortes en curso quedan
    /// sin reportar.
    pub fn close(mut self) -> Result<ShopSnapshot, ShopError> {
        self.sender
            .send(ShopMessage::Close)
            .map_err(|_| ShopError::ChannelClosed)?;
        let coordinator = self.coordinator.take().ok_or(ShopError::ChannelClosed)?;
        coordinator.join().map_err(|_| ShopError::CoordinatorPanicked)
    }
}

impl Drop for ShopHandle {
    fn drop(&mut self) {
        // el coordinador tiene su propio Sender, sin Close no saldría nunca del recv
        if self.coordinator.is_some() {
            let _ = self.sender.send(ShopMessage::Close);
        }
    }
}

fn run_shop(
    mut state: ShopState,
    inbox: Receiver<ShopMessage>,
    outbox: Sender<ShopMessage>,
    cutting_time: Duration,
    events: impl EventSink,
) -> ShopSnapshot {
    // outbox mantiene vivo el canal, recv solo termina con Close
    while let Ok(msg) = inbox.recv() {
        let event = match msg {
            ShopMessage::Arrived(client) => state.on_arrival(client),
            ShopMessage::Finished(barber) => state.on_service_complete(barber),
            ShopMessage::Close => break,
        };
        if let Some((barber, client)) = event.assignment() {
            cut_hair(barber, client, cutting_time, outbox.clone());
        }
        events.emit(event);
    }
    debug!("[Barbería] cerrada, {}", state.stats());
    state.snapshot()
}

fn cut_hair(barber: BarberId, client: ClientId, cutting_time: Duration, finished: Sender<ShopMessage>) {
    thread::spawn(move || {
        debug!("[{}] Cortando pelo al {}", barber, client);
        thread::sleep(cutting_time);
        debug!("[{}] Terminé con el {}", barber, client);
        // si la barbería cerró nadie espera este aviso
        let _ = finished.send(ShopMessage::Finished(barber));
    });
}
