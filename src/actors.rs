// La barbería es el único dueño del estado: su mailbox ordena llegadas y
// cortes terminados, nunca hay dos decisiones a la vez. Cada barbero es otro
// actor que recibe un cliente, corta y avisa.

use std::time::Duration;

use actix::{Actor, Addr, AsyncContext, Context, Handler, Message, MessageResult, ResponseFuture};
use log::{debug, error};

use crate::config::ShopConfig;
use crate::error::ShopError;
use crate::events::{EventSink, ShopEvent};
use crate::model::{BarberId, ClientId};
use crate::shop::{ShopSnapshot, ShopState};

/******************************************/
/*           DEFINICIÓN DE ACTORES        */
/******************************************/

pub struct BarberShop {
    state: ShopState,
    barbers: Vec<Addr<Barber>>,
    barbers_amount: usize,
    cutting_time: Duration,
    events: Box<dyn EventSink>,
}

pub struct Barber {
    id: BarberId,
    cutting_time: Duration,
    // a quién avisarle cuando termino un corte
    shop: Addr<BarberShop>,
}

impl BarberShop {
    pub fn new(config: &ShopConfig, events: impl EventSink) -> Self {
        BarberShop {
            state: ShopState::new(config.barbers, config.hall_seats),
            barbers: Vec::with_capacity(config.barbers),
            barbers_amount: config.barbers,
            cutting_time: config.cutting_time(),
            events: Box::new(events),
        }
    }

    fn dispatch(&mut self, event: ShopEvent) {
        if let Some((barber, client)) = event.assignment() {
            match self.barbers.get(barber.index()) {
                Some(addr) => addr.do_send(CutHair { client }),
                None => error!("[Barbería] no existe el {}", barber),
            }
        }
        self.events.emit(event);
    }
}

impl Actor for BarberShop {
    type Context = Context<Self>;

    // los barberos se crean una sola vez, cuando abre la barbería
    fn started(&mut self, ctx: &mut Self::Context) {
        let shop = ctx.address();
        self.barbers = (0..self.barbers_amount)
            .map(|id| {
                Barber {
                    id: BarberId(id),
                    cutting_time: self.cutting_time,
                    shop: shop.clone(),
                }
                .start()
            })
            .collect();
        debug!("[Barbería] abierta con {} barberos", self.barbers.len());
    }
}

impl Actor for Barber {
    type Context = Context<Self>;
}

/******************************************/
/*   DEFINICIÓN DE MENSAJES Y HANDLERS    */
/******************************************/

// LLEGADAS -> BARBERIA
/// Único mensaje de trabajo que la barbería acepta desde afuera.
///
/// ```compile_fail
/// use barberia::actors::HaircutFinished;
/// ```
#[derive(Message)]
#[rtype(result = "()")]
pub struct ClientArrived {
    pub client: ClientId,
}

impl Handler<ClientArrived> for BarberShop {
    type Result = ();
    fn handle(&mut self, msg: ClientArrived, _ctx: &mut Context<Self>) -> Self::Result {
        let event = self.state.on_arrival(msg.client);
        self.dispatch(event);
    }
}

// BARBERO -> BARBERIA
// solo los barberos de la barbería pueden avisar que terminaron, desde afuera
// nada más entran clientes (ClientArrived)
#[derive(Message)]
#[rtype(result = "()")]
pub(crate) struct HaircutFinished {
    pub(crate) barber: BarberId,
}

impl Handler<HaircutFinished> for BarberShop {
    type Result = ();
    fn handle(&mut self, msg: HaircutFinished, _ctx: &mut Context<Self>) -> Self::Result {
        let event = self.state.on_service_complete(msg.barber);
        self.dispatch(event);
    }
}

// BARBERIA -> BARBERO
#[derive(Message)]
#[rtype(result = "()")]
pub(crate) struct CutHair {
    pub(crate) client: ClientId,
}

// el corte tarda, así que devolvemos un futuro: el runtime lo corre aparte y
// cuando termina la espera le avisa a la barbería
impl Handler<CutHair> for Barber {
    type Result = ResponseFuture<()>;
    fn handle(&mut self, msg: CutHair, _ctx: &mut Context<Self>) -> Self::Result {
        let barber = self.id;
        let cutting_time = self.cutting_time;
        let shop = self.shop.clone();
        debug!("[{}] Cortando pelo al {}", barber, msg.client);
        Box::pin(async move {
            actix_rt::time::sleep(cutting_time).await;
            debug!("[{}] Terminé con el {}", barber, msg.client);
            shop.do_send(HaircutFinished { barber });
        })
    }
}

// consulta del estado, para el resumen final y los tests
#[derive(Message)]
#[rtype(result = "ShopSnapshot")]
pub struct GetSnapshot;

impl Handler<GetSnapshot> for BarberShop {
    type Result = MessageResult<GetSnapshot>;
    fn handle(&mut self, _msg: GetSnapshot, _ctx: &mut Context<Self>) -> Self::Result {
        MessageResult(self.state.snapshot())
    }
}

// la respuesta llega después de todo lo que ya estaba en el mailbox
pub async fn snapshot(shop: &Addr<BarberShop>) -> Result<ShopSnapshot, ShopError> {
    Ok(shop.send(GetSnapshot).await?)
}
