use std::ops::Range;
use std::thread;
use std::time::Duration;

use actix::Addr;
use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::actors::{BarberShop, ClientArrived};
use crate::channels::ArrivalSender;
use crate::config::ShopConfig;
use crate::error::ConfigError;
use crate::model::ClientId;

/// Esperas entre llegadas sorteadas uniformemente en `[min, max)` ms. Con
/// semilla la secuencia se repite exacta.
#[derive(Debug)]
pub struct UniformGaps {
    rng: StdRng,
    range_ms: Range<u64>,
}

impl UniformGaps {
    pub fn new(range_ms: Range<u64>, seed: Option<u64>) -> Result<Self, ConfigError> {
        // gen_range entra en pánico con un rango vacío
        if range_ms.is_empty() {
            return Err(ConfigError::EmptyGapRange {
                min: range_ms.start,
                max: range_ms.end,
            });
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(UniformGaps { rng, range_ms })
    }

    pub fn from_config(config: &ShopConfig) -> Result<Self, ConfigError> {
        Self::new(config.gap_range_ms(), config.seed)
    }
}

impl Iterator for UniformGaps {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        Some(Duration::from_millis(
            self.rng.gen_range(self.range_ms.clone()),
        ))
    }
}

/// Genera clientes numerados desde 1, cada uno después de la espera que le
/// toca. Las esperas pueden ser aleatorias ([`UniformGaps`]) o un guion fijo
/// para los tests; se consume una sola vez.
pub struct ArrivalSource<G> {
    gaps: G,
    next_client: u64,
}

impl<G> ArrivalSource<G>
where
    G: Iterator<Item = Duration>,
{
    pub fn new(gaps: G) -> Self {
        ArrivalSource {
            gaps,
            next_client: 1,
        }
    }

    /// Corre sobre el runtime de actix hasta que se acaben las esperas o la
    /// barbería deje de existir.
    pub async fn run(self, shop: Addr<BarberShop>) {
        for (gap, client) in self {
            actix_rt::time::sleep(gap).await;
            if !shop.connected() {
                break;
            }
            trace!("[Llegadas] entra el {}", client);
            shop.do_send(ClientArrived { client });
        }
    }

    /// Igual que [`ArrivalSource::run`] pero en un hilo del sistema.
    pub fn run_blocking(self, shop: ArrivalSender) {
        for (gap, client) in self {
            thread::sleep(gap);
            trace!("[Llegadas] entra el {}", client);
            if shop.arrive(client).is_err() {
                break;
            }
        }
    }
}

impl<G> Iterator for ArrivalSource<G>
where
    G: Iterator<Item = Duration>,
{
    type Item = (Duration, ClientId);

    fn next(&mut self) -> Option<Self::Item> {
        let gap = self.gaps.next()?;
        let client = ClientId(self.next_client);
        self.next_client += 1;
        Some((gap, client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::ShopMessage;

    #[test]
    fn seeded_gaps_repeat_and_stay_in_range() {
        let first: Vec<_> = UniformGaps::new(7..35, Some(42)).unwrap().take(100).collect();
        let second: Vec<_> = UniformGaps::new(7..35, Some(42)).unwrap().take(100).collect();
        assert_eq!(first, second);
        assert!(first
            .iter()
            .all(|gap| (Duration::from_millis(7)..Duration::from_millis(35)).contains(gap)));
    }

    #[test]
    fn empty_gap_range_is_refused_up_front() {
        assert!(matches!(
            UniformGaps::new(10..10, Some(1)),
            Err(ConfigError::EmptyGapRange { min: 10, max: 10 })
        ));
    }

    #[test]
    fn clients_are_numbered_in_arrival_order() {
        let gaps = [5, 0, 12].map(Duration::from_millis);
        let arrivals: Vec<_> = ArrivalSource::new(gaps.into_iter()).collect();
        assert_eq!(
            arrivals,
            vec![
                (Duration::from_millis(5), ClientId(1)),
                (Duration::ZERO, ClientId(2)),
                (Duration::from_millis(12), ClientId(3)),
            ]
        );
    }

    #[test]
    fn blocking_source_stops_when_the_shop_is_gone() {
        let (tx, rx) = std::sync::mpsc::channel();
        drop(rx);
        // esperas infinitas: si no cortara al fallar el envío, el test no terminaría
        let gaps = std::iter::repeat(Duration::ZERO);
        ArrivalSource::new(gaps).run_blocking(ArrivalSender::new(tx));
    }

    #[test]
    fn blocking_source_delivers_every_scripted_client() {
        let (tx, rx) = std::sync::mpsc::channel();
        ArrivalSource::new(std::iter::repeat(Duration::ZERO).take(3)).run_blocking(ArrivalSender::new(tx));
        let clients: Vec<_> = rx
            .iter()
            .map(|msg| match msg {
                ShopMessage::Arrived(client) => client,
                other => panic!("mensaje inesperado {:?}", other),
            })
            .collect();
        assert_eq!(clients, vec![ClientId(1), ClientId(2), ClientId(3)]);
    }
}
