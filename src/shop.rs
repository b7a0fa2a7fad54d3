use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use crate::error::InvariantViolation;
use crate::events::ShopEvent;
use crate::model::{BarberId, ClientId};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ShopStats {
    pub arrivals: u64,
    pub served: u64,
    pub rejected: u64,
    pub assigned_immediately: u64,
    pub assigned_from_queue: u64,
    pub max_queue_len: usize,
}

impl fmt::Display for ShopStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "llegaron {} clientes: {} atendidos, {} rechazados ({} pasaron directo, {} desde la sala, sala máxima {})",
            self.arrivals,
            self.served,
            self.rejected,
            self.assigned_immediately,
            self.assigned_from_queue,
            self.max_queue_len
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopSnapshot {
    pub free_barbers: Vec<BarberId>,
    // el primero es el próximo en ser atendido
    pub waiting: Vec<ClientId>,
    pub in_service: Vec<(BarberId, ClientId)>,
    pub hall_seats: usize,
    pub stats: ShopStats,
}

impl ShopSnapshot {
    /// Verifica los invariantes de la barbería. Cualquier error es un bug.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if let (Some(&barber), false) = (self.free_barbers.first(), self.waiting.is_empty()) {
            return Err(InvariantViolation::IdleBarberWithWaitingClients {
                barber,
                waiting: self.waiting.len(),
            });
        }
        if self.waiting.len() > self.hall_seats {
            return Err(InvariantViolation::HallOverflow {
                waiting: self.waiting.len(),
                seats: self.hall_seats,
            });
        }
        for (barber, client) in &self.in_service {
            if self.free_barbers.contains(barber) {
                return Err(InvariantViolation::BarberFreeAndBusy(*barber));
            }
            if self.waiting.contains(client) {
                return Err(InvariantViolation::ClientWaitingAndServed(*client));
            }
        }
        // todo cliente que llegó está en exactamente un lugar
        let accounted = self.stats.rejected
            + self.stats.served
            + self.in_service.len() as u64
            + self.waiting.len() as u64;
        if accounted != self.stats.arrivals {
            return Err(InvariantViolation::LostClients {
                arrivals: self.stats.arrivals,
                accounted,
            });
        }
        Ok(())
    }
}

// barberos libres, sala de espera y quién atiende a quién. No sabe nada de
// hilos ni de actores: quien lo maneje lo llama de a una operación por vez
#[derive(Debug)]
pub struct ShopState {
    // se asigna siempre el de menor id
    free_barbers: BTreeSet<BarberId>,
    busy: BTreeMap<BarberId, ClientId>,
    hall: VecDeque<ClientId>,
    hall_seats: usize,
    stats: ShopStats,
}

impl ShopState {
    pub fn new(barbers: usize, hall_seats: usize) -> Self {
        ShopState {
            free_barbers: (0..barbers).map(BarberId).collect(),
            busy: BTreeMap::new(),
            hall: VecDeque::with_capacity(hall_seats),
            hall_seats,
            stats: ShopStats::default(),
        }
    }

    pub fn on_arrival(&mut self, client: ClientId) -> ShopEvent {
        self.stats.arrivals += 1;
        if let Some(barber) = self.free_barbers.pop_first() {
            self.busy.insert(barber, client);
            self.stats.assigned_immediately += 1;
            return ShopEvent::AssignedImmediately { client, barber };
        }
        if self.hall.len() < self.hall_seats {
            self.hall.push_back(client);
            self.stats.max_queue_len = self.stats.max_queue_len.max(self.hall.len());
            return ShopEvent::Queued {
                client,
                position: self.hall.len(),
            };
        }
        self.stats.rejected += 1;
        ShopEvent::Rejected { client }
    }

    /// Un barbero terminó un corte: toma al primero de la sala o se duerme.
    ///
    /// # Panics
    ///
    /// Si `barber` no estaba atendiendo a nadie. Eso solo pasa si alguien
    /// reporta dos veces el mismo corte.
    pub fn on_service_complete(&mut self, barber: BarberId) -> ShopEvent {
        if self.busy.remove(&barber).is_none() {
            panic!("{} terminó un corte que no tenía asignado", barber);
        }
        self.stats.served += 1;
        match self.hall.pop_front() {
            Some(client) => {
                self.busy.insert(barber, client);
                self.stats.assigned_from_queue += 1;
                ShopEvent::AssignedFromQueue {
                    client,
                    barber,
                    remaining: self.hall.len(),
                }
            }
            None => {
                self.free_barbers.insert(barber);
                ShopEvent::BarberIdle { barber }
            }
        }
    }

    pub fn stats(&self) -> ShopStats {
        self.stats
    }

    pub fn snapshot(&self) -> ShopSnapshot {
        ShopSnapshot {
            free_barbers: self.free_barbers.iter().copied().collect(),
            waiting: self.hall.iter().copied().collect(),
            in_service: self.busy.iter().map(|(b, c)| (*b, *c)).collect(),
            hall_seats: self.hall_seats,
            stats: self.stats,
        }
    }
}
