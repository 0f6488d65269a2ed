use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use serde_json::{json, Value};

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

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One synthetic page view.
///
/// Visitors shown the variant (`condition_1`) click more often, except
/// mobile visitors without cookies, for whom the variant backfires.
fn row(rng: &mut SimpleRng) -> Value {
    let regions = ["NH", "MA", "CA", "TX", "NY"];
    let sources = ["search", "social", "email", "unknown"];
    let languages = ["en-US", "en-GB", "de", "fr", "es"];
    let devices = ["Computer", "Mobile", "Tablet"];
    let heights = [480.0, 600.0, 720.0, 768.0, 900.0, 1080.0, 1440.0];

    let device = *rng.pick(&devices);
    let cookies = rng.chance(0.7);
    let variant = rng.chance(0.5);

    let inverted = device == "Mobile" && !cookies;
    let click_rate = match (variant, inverted) {
        (true, false) | (false, true) => 0.35,
        (false, false) | (true, true) => 0.10,
    };

    // some referrers are missing, as in real clickstream exports
    let source = if rng.chance(0.1) {
        Value::Null
    } else {
        json!(*rng.pick(&sources))
    };

    let region = *rng.pick(&regions);
    let language = *rng.pick(&languages);
    let colordepth = if rng.chance(0.8) { 24.0 } else { 32.0 };
    let viewheight = *rng.pick(&heights);
    let clicked = rng.chance(click_rate);

    json!({
        "geo_region": region,
        "refr_source": source,
        "browser_language": language,
        "browser_cookies": cookies,
        "browser_colordepth": colordepth,
        "browser_viewheight": viewheight,
        "dvce_type": device,
        "condition_1": variant,
        "clicked": clicked,
    })
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows: Vec<Value> = (0..5000).map(|_| row(&mut rng)).collect();
    let count = rows.len();

    let bundle = json!({
        "rows": rows,
        "width": 10,
        "depth": 3,
        "results": 10,
        "bins": 5,
        "targets": {"condition_1": true, "clicked": true},
    });

    let output_path = "sample_data.json";
    let file = std::fs::File::create(output_path).context("creating output file")?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &bundle).context("writing sample data")?;
    writer.flush()?;

    println!("Wrote {count} rows to {output_path}");
    Ok(())
}
