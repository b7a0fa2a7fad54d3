use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use barberia::channels::ShopHandle;
use barberia::ShopError;
use barberia::{BarberId, ClientId, ShopConfig, ShopEvent};

const TIMEOUT: Duration = Duration::from_secs(5);

fn config(barbers: usize, hall_seats: usize, cutting_time_ms: u64) -> ShopConfig {
    ShopConfig {
        barbers,
        hall_seats,
        cutting_time_ms,
        ..ShopConfig::default()
    }
}

fn take_events(events: &Receiver<ShopEvent>, n: usize) -> Vec<ShopEvent> {
    (0..n)
        .map(|_| events.recv_timeout(TIMEOUT).expect("la barbería no emitió el evento"))
        .collect()
}

#[test]
fn lone_client_waits_one_haircut_before_the_barber_sleeps() {
    let (tx, events) = mpsc::channel();
    let shop = ShopHandle::spawn(&config(1, 3, 50), tx);
    let start = Instant::now();

    shop.arrive(ClientId(1)).unwrap();
    assert_eq!(
        take_events(&events, 2),
        vec![
            ShopEvent::AssignedImmediately {
                client: ClientId(1),
                barber: BarberId(0)
            },
            ShopEvent::BarberIdle {
                barber: BarberId(0)
            },
        ]
    );
    assert!(start.elapsed() >= Duration::from_millis(50));

    let snapshot = shop.close().unwrap();
    assert_eq!(snapshot.stats.served, 1);
    assert_eq!(snapshot.check_invariants(), Ok(()));
}

#[test]
fn burst_fills_the_hall_rejects_one_and_drains_in_order() {
    let (tx, events) = mpsc::channel();
    // cortes largos: la ráfaga entera se decide antes del primer aviso de fin
    let shop = ShopHandle::spawn(&config(1, 3, 100), tx);

    for id in 1..=5 {
        shop.arrive(ClientId(id)).unwrap();
    }
    assert_eq!(
        take_events(&events, 9),
        vec![
            ShopEvent::AssignedImmediately {
                client: ClientId(1),
                barber: BarberId(0)
            },
            ShopEvent::Queued {
                client: ClientId(2),
                position: 1
            },
            ShopEvent::Queued {
                client: ClientId(3),
                position: 2
            },
            ShopEvent::Queued {
                client: ClientId(4),
                position: 3
            },
            ShopEvent::Rejected {
                client: ClientId(5)
            },
            ShopEvent::AssignedFromQueue {
                client: ClientId(2),
                barber: BarberId(0),
                remaining: 2
            },
            ShopEvent::AssignedFromQueue {
                client: ClientId(3),
                barber: BarberId(0),
                remaining: 1
            },
            ShopEvent::AssignedFromQueue {
                client: ClientId(4),
                barber: BarberId(0),
                remaining: 0
            },
            ShopEvent::BarberIdle {
                barber: BarberId(0)
            },
        ]
    );

    let snapshot = shop.close().unwrap();
    assert_eq!(snapshot.stats.arrivals, 5);
    assert_eq!(snapshot.stats.served, 4);
    assert_eq!(snapshot.stats.max_queue_len, 3);
}

#[test]
fn many_writers_never_break_the_shop() {
    let (tx, events) = mpsc::channel();
    let shop = ShopHandle::spawn(&config(2, 2, 5), tx);

    // dos productores compitiendo por el mismo canal, con ids que no se pisan
    let writers: Vec<_> = [0u64, 1000]
        .into_iter()
        .map(|offset| {
            let sender = shop.sender();
            thread::spawn(move || {
                for id in 1..=100 {
                    sender.arrive(ClientId(offset + id)).unwrap();
                    thread::sleep(Duration::from_millis(1));
                }
            })
        })
        .collect();
    writers.into_iter().for_each(|t| t.join().unwrap());
    thread::sleep(Duration::from_millis(100));

    let snapshot = shop.close().unwrap();
    assert_eq!(snapshot.stats.arrivals, 200);
    assert_eq!(snapshot.check_invariants(), Ok(()));
    // cada llegada y cada fin de corte dejó exactamente un evento
    let emitted = events.try_iter().count() as u64;
    assert_eq!(emitted, snapshot.stats.arrivals + snapshot.stats.served);
}

#[test]
fn closing_an_idle_shop_hands_back_every_barber() {
    let (tx, _events) = mpsc::channel();
    let shop = ShopHandle::spawn(&config(3, 0, 10), tx);
    let snapshot = shop.close().unwrap();
    assert_eq!(
        snapshot.free_barbers,
        vec![BarberId(0), BarberId(1), BarberId(2)]
    );
    assert!(snapshot.waiting.is_empty());
    assert_eq!(snapshot.stats, Default::default());
}

#[test]
fn arrival_sender_cannot_cut_a_haircut_short() {
    let (tx, events) = mpsc::channel();
    let shop = ShopHandle::spawn(&config(1, 3, 200), tx);

    // lo único que puede hacer un productor externo es traer clientes
    let outside = shop.sender();
    outside.arrive(ClientId(1)).unwrap();
    outside.arrive(ClientId(2)).unwrap();
    assert_eq!(
        take_events(&events, 2),
        vec![
            ShopEvent::AssignedImmediately {
                client: ClientId(1),
                barber: BarberId(0)
            },
            ShopEvent::Queued {
                client: ClientId(2),
                position: 1
            },
        ]
    );
    // el cliente 2 recién pasa cuando el barbero de verdad termina con el 1
    assert!(events.recv_timeout(Duration::from_millis(100)).is_err());
    assert_eq!(
        take_events(&events, 2),
        vec![
            ShopEvent::AssignedFromQueue {
                client: ClientId(2),
                barber: BarberId(0),
                remaining: 0
            },
            ShopEvent::BarberIdle {
                barber: BarberId(0)
            },
        ]
    );

    let snapshot = shop.close().unwrap();
    assert_eq!(snapshot.stats.served, 2);
    assert_eq!(snapshot.check_invariants(), Ok(()));
}

#[test]
fn dropping_the_handle_closes_the_shop() {
    let (tx, _events) = mpsc::channel();
    let shop = ShopHandle::spawn(&config(1, 1, 10), tx);
    let outside = shop.sender();
    drop(shop);

    // el coordinador sale del recv y suelta el canal: las llegadas empiezan a fallar
    let start = Instant::now();
    let mut id = 0;
    loop {
        id += 1;
        match outside.arrive(ClientId(id)) {
            Err(ShopError::ChannelClosed) => break,
            Err(other) => panic!("error inesperado {:?}", other),
            Ok(()) => {
                assert!(start.elapsed() < TIMEOUT, "la barbería sigue abierta");
                thread::sleep(Duration::from_millis(5));
            }
        }
    }
}
