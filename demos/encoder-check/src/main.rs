//! Encoder check firmware
//!
//! Reads an incremental encoder with A, B and Z (index) outputs on the
//! Raspberry Pi Pico 2 and logs, once per second, the per-channel edge
//! intervals, the revolution time, RPM and whether the last revolution
//! produced exactly NPR notches.
//!
//! # Wiring
//!
//! | Signal | Pico 2 Pin | Notes                       |
//! |--------|------------|-----------------------------|
//! | ENC A  | GP2        | Open collector, pull-up on  |
//! | ENC B  | GP3        | Open collector, pull-up on  |
//! | ENC Z  | GP4        | Open collector, pull-up on  |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::join::join4;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Pull};
use embassy_time::{Duration, Instant, Timer};
use {defmt_rtt as _, panic_probe as _};

use encoder_quality_check::{
    AsyncEdgePin, ChannelId, ChannelIsr, EdgeDispatch, EdgeTimer, Encoder, EncoderConfig,
    EncoderTimers, IndexCheck, IndexTimer, PinMode, Signal, STATE_LEN_MAX,
};

/// Tell the Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Notches per revolution of the encoder under test.
const NPR: u32 = 600;

/// A edges a revolution may be off by and still pass.
const NOTCH_TOLERANCE: u32 = 0;

const REPORT_PERIOD: Duration = Duration::from_millis(1000);

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

static A_TIMER: EdgeTimer = EdgeTimer::new();
static B_TIMER: EdgeTimer = EdgeTimer::new();
static Z_TIMER: IndexTimer<'static> = IndexTimer::new(&A_TIMER);

static A_DISPATCH: EdgeDispatch = EdgeDispatch::new();
static B_DISPATCH: EdgeDispatch = EdgeDispatch::new();
static Z_DISPATCH: EdgeDispatch = EdgeDispatch::new();

type BoardEncoder = Encoder<'static, AsyncEdgePin<'static>>;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn on_a() {
    A_TIMER.on_interrupt(Instant::now());
}

fn on_b() {
    B_TIMER.on_interrupt(Instant::now());
}

fn on_z() {
    Z_TIMER.on_interrupt(Instant::now());
}

// ---------------------------------------------------------------------------
// Loops
// ---------------------------------------------------------------------------

/// Feed one physical pin into its dispatcher. The RP input never fails, so
/// this only returns if the dispatcher does.
async fn edges(dispatch: &'static EdgeDispatch, mut input: Input<'static>, id: ChannelId) {
    let _ = dispatch.run(&mut input).await;
    warn!("Edge loop for channel {} ended", id);
}

async fn report(encoder: &BoardEncoder) {
    loop {
        Timer::after(REPORT_PERIOD).await;

        match encoder.state_string::<STATE_LEN_MAX>() {
            Ok(state) => info!("{}", state.as_str()),
            Err(_) => warn!("Encoder state did not fit the report buffer"),
        }

        match encoder.rpm() {
            Some(rpm) => info!("Speed: {} rpm", rpm),
            None => debug!("Speed: unknown"),
        }

        match encoder.check_revolution() {
            IndexCheck::Pass { counted } => info!("Revolution OK: {} edges", counted),
            IndexCheck::Fail { expected, counted } => {
                error!("Revolution FAIL: {} edges, expected {}", counted, expected)
            }
            IndexCheck::Pending => debug!("Revolution check pending"),
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("encoder-check starting, NPR = {}", NPR);

    let a_input = Input::new(p.PIN_2, Pull::Up);
    let b_input = Input::new(p.PIN_3, Pull::Up);
    let z_input = Input::new(p.PIN_4, Pull::Up);

    let config = EncoderConfig {
        npr: NPR,
        notch_tolerance: NOTCH_TOLERANCE,
    };
    let timers = EncoderTimers {
        a: &A_TIMER,
        b: &B_TIMER,
        z: &Z_TIMER,
    };
    let mut encoder: BoardEncoder = Encoder::with_config(config, timers);

    // —— Channel registration ———————————————————————————————————————————————

    let channels: [(ChannelId, AsyncEdgePin<'static>, Signal, fn()); 3] = [
        (ChannelId::A, A_DISPATCH.pin(2), Signal::Rising, on_a),
        (ChannelId::B, B_DISPATCH.pin(3), Signal::Rising, on_b),
        (ChannelId::Z, Z_DISPATCH.pin(4), Signal::Rising, on_z),
    ];

    for (id, pin, signal, handler) in channels {
        if let Err(e) = encoder.add_channel(id, pin, PinMode::PullUp, signal) {
            error!("Failed to add channel {}: {}", id, e);
            continue;
        }
        if let Err(e) = encoder.start(id, handler) {
            error!("Failed to start channel {}: {}", id, e);
        }
    }

    info!("Encoder check running, rotate the shaft");

    // —— Run ————————————————————————————————————————————————————————————————

    join4(
        edges(&A_DISPATCH, a_input, ChannelId::A),
        edges(&B_DISPATCH, b_input, ChannelId::B),
        edges(&Z_DISPATCH, z_input, ChannelId::Z),
        report(&encoder),
    )
    .await;
}
