use std::f64::consts::PI;

use amptune::data::{SeismicGrid, SegyTemplate, SegyWriter, Shape};
use anyhow::{Context, Result};

const N_TRACES: usize = 200;
const N_SAMPLES: usize = 500;
/// Sample interval in seconds.
const DT: f64 = 0.002;
const OUTPUT: &str = "sample_data.sgy";

/// Ricker wavelet with peak frequency `freq` (Hz) at lag `t` (s).
fn ricker(t: f64, freq: f64) -> f64 {
    let a = (PI * freq * t).powi(2);
    (1.0 - 2.0 * a) * (-a).exp()
}

/// A reflector: two-way time at trace 0, dip and reflection strength.
struct Horizon {
    t0: f64,
    dip_per_trace: f64,
    amplitude: f64,
}

impl Horizon {
    fn time_at(&self, trace: usize) -> f64 {
        self.t0 + self.dip_per_trace * trace as f64
    }
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

fn synthesize(rng: &mut SimpleRng) -> SeismicGrid {
    let horizons = [
        Horizon { t0: 0.150, dip_per_trace: 0.0, amplitude: 1.0 },
        Horizon { t0: 0.320, dip_per_trace: 0.0004, amplitude: -0.7 },
        Horizon { t0: 0.520, dip_per_trace: -0.0002, amplitude: 0.8 },
        Horizon { t0: 0.700, dip_per_trace: 0.0006, amplitude: 0.5 },
        Horizon { t0: 0.880, dip_per_trace: 0.0001, amplitude: -0.6 },
    ];
    let freq = 25.0;

    // Bright spot on the third horizon, tapered across its trace span.
    let anomaly_traces = 90..130;
    let anomaly_gain = 1.8;

    let mut grid = SeismicGrid::filled(Shape::new(N_TRACES, N_SAMPLES), 0.0);
    for trace in 0..N_TRACES {
        let samples = grid.trace_mut(trace);
        for (s, value) in samples.iter_mut().enumerate() {
            let t = s as f64 * DT;
            let mut v = 0.0;
            for (k, h) in horizons.iter().enumerate() {
                let mut amp = h.amplitude;
                if k == 2 && anomaly_traces.contains(&trace) {
                    let x = (trace - anomaly_traces.start) as f64
                        / (anomaly_traces.len() - 1) as f64;
                    amp *= 1.0 + (anomaly_gain - 1.0) * (PI * x).sin();
                }
                v += amp * ricker(t - h.time_at(trace), freq);
            }
            *value = (v + rng.gauss(0.0, 0.05)) as f32;
        }
    }
    grid
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    let grid = synthesize(&mut rng);
    let template = SegyTemplate::synthetic(N_TRACES, N_SAMPLES, DT)
        .context("Cannot build SEG-Y headers")?;
    SegyWriter::with_template(OUTPUT, template)
        .write_file(&grid, DT)
        .with_context(|| format!("Cannot write {OUTPUT}"))?;

    println!(
        "Wrote {OUTPUT}: {N_TRACES} traces × {N_SAMPLES} samples at {:.0} ms",
        DT * 1000.0
    );
    Ok(())
}
