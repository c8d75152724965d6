use anyhow::{Context, Result};

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
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

const ROWS: usize = 1000;
const MISSING_RATE: f64 = 0.03;

const HEADER: [&str; 10] = [
    "Temperature",
    "Humidite",
    "PM2.5",
    "PM10",
    "NO2",
    "SO2",
    "CO",
    "Proximite_zones_industrielles",
    "Densite_population",
    "Qualite_air",
];

/// Base level of each class: (label, mean PM2.5, mean NO2).
const CLASSES: [(&str, f64, f64); 4] = [
    ("bon", 8.0, 18.0),
    ("moyen", 22.0, 28.0),
    ("mauvais", 45.0, 40.0),
    ("dangereuse", 80.0, 55.0),
];

fn cell(rng: &mut SimpleRng, value: f64, decimals: usize) -> String {
    if rng.chance(MISSING_RATE) {
        String::new()
    } else {
        format!("{value:.decimals$}")
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "pollution.csv".to_string());

    let mut writer =
        csv::Writer::from_path(&output_path).with_context(|| format!("creating {output_path}"))?;
    writer.write_record(HEADER)?;

    for _ in 0..ROWS {
        // Skew towards the cleaner classes.
        let class = match rng.next_f64() {
            u if u < 0.4 => 0,
            u if u < 0.7 => 1,
            u if u < 0.9 => 2,
            _ => 3,
        };
        let (label, pm25_mean, no2_mean) = CLASSES[class];
        let severity = class as f64;

        let pm25 = rng.gauss(pm25_mean, pm25_mean * 0.25).max(0.5);
        let pm10 = (pm25 * 1.6 + rng.gauss(5.0, 4.0)).max(pm25);
        let no2 = rng.gauss(no2_mean, 6.0).max(1.0);
        let so2 = rng.gauss(4.0 + severity * 6.0, 3.0).max(0.1);
        let co = rng.gauss(1.0 + severity * 0.6, 0.3).max(0.05);
        let proximity = rng.gauss(12.0 - severity * 2.5, 2.0).max(0.5);
        let temperature = rng.gauss(28.0, 5.0);
        let humidity = rng.gauss(65.0, 12.0).clamp(10.0, 100.0);
        let density = rng.gauss(400.0 + severity * 120.0, 90.0).max(50.0).round();

        // CO is stored with its unit and the occasional placeholder.
        let co_cell = if rng.chance(MISSING_RATE) {
            "n/a".to_string()
        } else {
            format!("{co:.2}µg")
        };

        let record = [
            cell(&mut rng, temperature, 1),
            cell(&mut rng, humidity, 1),
            cell(&mut rng, pm25, 1),
            cell(&mut rng, pm10, 1),
            cell(&mut rng, no2, 1),
            cell(&mut rng, so2, 1),
            co_cell,
            cell(&mut rng, proximity, 1),
            format!("{density:.0}"),
            label.to_string(),
        ];
        writer.write_record(&record)?;
    }

    writer.flush()?;
    println!("Wrote {ROWS} measurements to {output_path}");
    Ok(())
}
