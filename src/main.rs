//! beepr firmware entry point (nRF52840 + SoftDevice S140).
//!
//! Init order matters: the render coordinator exists before the store
//! (which renders through it), and the store exists before the queue is
//! handed to the BLE side, so nothing is ever rendered or enqueued into a
//! half-built pipeline.
//!
//! Tasks:
//!   - softdevice_task: SoftDevice event pump
//!   - ble_task:        advertising + connection state → AncsHandler
//!   - main loop:       buttons + queue drain + keep-alive, every tick

#![no_std]
#![no_main]

use defmt::{debug, info, trace, unwrap};
use defmt_rtt as _;
use panic_probe as _;

use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_nrf::bind_interrupts;
use embassy_nrf::gpio::{Input, Pull};
use embassy_nrf::interrupt::{self, InterruptExt, Priority};
use embassy_nrf::peripherals::TWISPI0;
use embassy_nrf::twim::{self, Twim};
use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, ThreadModeRawMutex};
use embassy_time::{Duration, Instant, Ticker, Timer};
use nrf_softdevice::Softdevice;
use static_cell::StaticCell;

use beepr::ancs::AncsHandler;
use beepr::apps::{AppTable, COMMON_APPS};
use beepr::ble;
use beepr::config::{
    BUTTON_DEBOUNCE_MS, BUTTON_DEBOUNCE_US, EVENT_DRAIN_PER_TICK, EVENT_QUEUE_CAPACITY,
    KEEPALIVE_SECS, MAIN_LOOP_TICK_MS, MAX_NOTIFICATIONS,
};
use beepr::notification::{EventQueue, NotificationStore};
use beepr::pager::Pager;
use beepr::render::RenderCoordinator;
use beepr::ui::buttons::Buttons;
use beepr::ui::debounce::EdgeLatch;
use beepr::ui::display::Panel;

bind_interrupts!(struct Irqs {
    TWISPI0 => twim::InterruptHandler<TWISPI0>;
});

type Renderer = RenderCoordinator<ThreadModeRawMutex, Panel<Twim<'static, TWISPI0>>>;
type Store = NotificationStore<'static, CriticalSectionRawMutex, Renderer, MAX_NOTIFICATIONS>;
type Queue = EventQueue<CriticalSectionRawMutex, EVENT_QUEUE_CAPACITY>;
type Handler =
    AncsHandler<'static, CriticalSectionRawMutex, AppTable<'static>, EVENT_QUEUE_CAPACITY>;

static RENDERER: StaticCell<Renderer> = StaticCell::new();
static STORE: StaticCell<Store> = StaticCell::new();
static QUEUE: StaticCell<Queue> = StaticCell::new();
static HANDLER: StaticCell<Handler> = StaticCell::new();

static APPS: AppTable<'static> = AppTable::new(COMMON_APPS);

static NEXT_LATCH: EdgeLatch = EdgeLatch::new(BUTTON_DEBOUNCE_US);
static CLEAR_LATCH: EdgeLatch = EdgeLatch::new(BUTTON_DEBOUNCE_US);

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn ble_task(sd: &'static Softdevice, handler: &'static Handler, pairing_mode: bool) -> ! {
    ble::run(sd, handler, pairing_mode).await
}

/// Priorities 0, 1 and 4 belong to the SoftDevice.
fn hal_config() -> embassy_nrf::config::Config {
    let mut config = embassy_nrf::config::Config::default();
    config.gpiote_interrupt_priority = Priority::P2;
    config.time_interrupt_priority = Priority::P2;
    config
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("beepr starting");

    let p = embassy_nrf::init(hal_config());

    // ── Display ──────────────────────────────────────────────────────────
    interrupt::TWISPI0.set_priority(Priority::P3);
    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let renderer: &'static Renderer = RENDERER.init(RenderCoordinator::new(Panel::probe(i2c)));
    renderer.show_status("Beeper", "Starting...");

    // ── Pipeline: renderer → store → queue ───────────────────────────────
    let store: &'static Store = STORE.init(NotificationStore::new(renderer));
    let queue: &'static Queue = QUEUE.init(EventQueue::new());
    let handler: &'static Handler = HANDLER.init(AncsHandler::new(queue, &APPS));

    // ── Pins ─────────────────────────────────────────────────────────────
    let pairing_mode = {
        let strap = Input::new(p.P0_24, Pull::Up);
        Timer::after(Duration::from_millis(1)).await;
        strap.is_low()
    };
    let mut buttons = Buttons::new(
        Input::new(p.P0_11, Pull::Up),
        Input::new(p.P0_12, Pull::Up),
        &NEXT_LATCH,
        &CLEAR_LATCH,
    );

    // ── BLE ──────────────────────────────────────────────────────────────
    let sd: &'static Softdevice = Softdevice::enable(&ble::softdevice_config());
    unwrap!(spawner.spawn(softdevice_task(sd)));
    unwrap!(spawner.spawn(ble_task(sd, handler, pairing_mode)));

    store.show_current();
    info!("beepr ready");

    // ── Main loop ────────────────────────────────────────────────────────
    let mut pager = Pager::new(
        store,
        queue,
        (&NEXT_LATCH, &CLEAR_LATCH),
        BUTTON_DEBOUNCE_MS,
        EVENT_DRAIN_PER_TICK,
    );
    let keepalive_period = Duration::from_secs(KEEPALIVE_SECS);
    let mut keepalive_at = Instant::now() + keepalive_period;
    let mut ticker = Ticker::every(Duration::from_millis(MAIN_LOOP_TICK_MS));

    loop {
        if let Either::Second(button) = select(ticker.next(), buttons.wait_edge()).await {
            trace!("Woken by {}", button);
        }

        let now = Instant::now();
        let report = pager.tick(buttons.levels(), now.as_millis() as u32);
        if report.drained > 0 {
            debug!(
                "Drained {} event(s), {} queued, {} dropped so far",
                report.drained,
                queue.len(),
                queue.dropped()
            );
        }

        if now >= keepalive_at {
            ble::KEEPALIVE.signal(());
            keepalive_at = now + keepalive_period;
        }
    }
}
