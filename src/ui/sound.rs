/// Sound engine: procedural cue effects via rodio.
///
/// Every `Cue` is synthesized once at startup from a small voice table
/// (a pitch sweep or a note run, optionally mixed with noise) and kept as
/// raw mono samples. Playback is fire-and-forget through a detached Sink.
///
/// Build without the "sound" feature (or pass `--noaudio`) to get the
/// silent stub instead.

use crate::sim::event::Cue;

#[cfg(feature = "sound")]
mod inner {
    use std::collections::HashMap;
    use std::f32::consts::TAU;
    use std::sync::Arc;

    use rodio::buffer::SamplesBuffer;
    use rodio::{OutputStream, OutputStreamHandle, Sink};
    use tracing::debug;

    use super::{voice, Shape, Voice, CUES};
    use crate::sim::event::Cue;

    const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        samples: HashMap<Cue, Arc<Vec<f32>>>,
    }

    impl SoundEngine {
        /// None when no output device can be opened.
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;
            let samples = CUES
                .iter()
                .map(|&cue| (cue, Arc::new(synth(&voice(cue)))))
                .collect();
            Some(SoundEngine { _stream: stream, handle, samples })
        }

        pub fn play(&self, cue: Cue) {
            let Some(buf) = self.samples.get(&cue) else { return };
            match Sink::try_new(&self.handle) {
                Ok(sink) => {
                    sink.append(SamplesBuffer::new(1, SAMPLE_RATE, buf.as_ref().clone()));
                    sink.detach();
                }
                Err(e) => debug!(?cue, "sink unavailable: {e}"),
            }
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Synthesis
    // ════════════════════════════════════════════════════════════

    fn synth(v: &Voice) -> Vec<f32> {
        // Fixed-seed LCG noise.
        let mut rng: u32 = 0x2545_F491;
        let mut noise = move || {
            rng = rng.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (rng >> 8) as f32 / (1u32 << 24) as f32 * 2.0 - 1.0
        };
        let mut out = vec![];
        let mut segment = |from: f32, to: f32, secs: f32, out: &mut Vec<f32>| {
            let n = (SAMPLE_RATE as f32 * secs) as usize;
            let mut phase = 0.0_f32;
            for i in 0..n {
                let t = i as f32 / n as f32;
                let freq = from + (to - from) * t;
                phase = (phase + freq / SAMPLE_RATE as f32) % 1.0;
                let tone = (phase * TAU).sin() * 0.75 + (phase * 3.0 * TAU).sin() * 0.25;
                let env = (1.0 - t).powf(0.7);
                let s = tone * (1.0 - v.noise) + noise() * v.noise;
                out.push(s * env * v.volume);
            }
        };
        match v.shape {
            Shape::Sweep { from, to, secs } => segment(from, to, secs, &mut out),
            Shape::Notes { notes, secs } => {
                for &f in notes {
                    segment(f, f, secs, &mut out);
                }
            }
        }
        out
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn every_cue_has_audible_samples() {
            for &cue in CUES {
                let s = synth(&voice(cue));
                assert!(!s.is_empty(), "{cue:?}");
                assert!(s.iter().all(|x| x.abs() <= 1.0), "{cue:?} clips");
            }
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Voice table
// ════════════════════════════════════════════════════════════

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
const CUES: &[Cue] = &[
    Cue::Bump, Cue::GateOpen, Cue::GateClose, Cue::LevelDoorOpen, Cue::Coin,
    Cue::LandingSoft, Cue::LandingHurt, Cue::LandingDead, Cue::Scream, Cue::Grab,
    Cue::SpikesOut, Cue::SpikesDeath, Cue::Chomper, Cue::ChomperDeath, Cue::HitPrince,
    Cue::HitGuard, Cue::Drinking, Cue::Mirror, Cue::LooseWobble, Cue::LooseCrash,
];

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
#[derive(Clone, Copy)]
enum Shape {
    Sweep { from: f32, to: f32, secs: f32 },
    Notes { notes: &'static [f32], secs: f32 },
}

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
#[derive(Clone, Copy)]
struct Voice {
    shape: Shape,
    /// 0.0 = pure tone, 1.0 = pure noise.
    noise: f32,
    volume: f32,
}

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn voice(cue: Cue) -> Voice {
    let sweep = |from, to, secs| Shape::Sweep { from, to, secs };
    let (shape, noise, volume) = match cue {
        Cue::Bump => (sweep(110.0, 90.0, 0.06), 0.3, 0.35),
        Cue::GateOpen => (sweep(200.0, 480.0, 0.25), 0.5, 0.25),
        Cue::GateClose => (sweep(480.0, 150.0, 0.15), 0.6, 0.3),
        Cue::LevelDoorOpen => (sweep(150.0, 400.0, 0.5), 0.4, 0.3),
        Cue::Coin => (Shape::Notes { notes: &[1047.0, 1319.0, 1568.0], secs: 0.045 }, 0.0, 0.25),
        Cue::LandingSoft => (sweep(90.0, 70.0, 0.05), 0.5, 0.3),
        Cue::LandingHurt => (sweep(140.0, 70.0, 0.15), 0.5, 0.35),
        Cue::LandingDead => (sweep(120.0, 40.0, 0.35), 0.7, 0.4),
        Cue::Scream => (sweep(900.0, 300.0, 0.4), 0.05, 0.25),
        Cue::Grab => (sweep(600.0, 650.0, 0.04), 0.1, 0.2),
        Cue::SpikesOut => (sweep(1200.0, 1400.0, 0.05), 0.7, 0.2),
        Cue::SpikesDeath => (Shape::Notes { notes: &[440.0, 370.0, 311.0], secs: 0.1 }, 0.3, 0.3),
        Cue::Chomper => (sweep(300.0, 250.0, 0.08), 0.8, 0.25),
        Cue::ChomperDeath => (Shape::Notes { notes: &[392.0, 311.0, 262.0], secs: 0.1 }, 0.4, 0.3),
        Cue::HitPrince => (sweep(220.0, 110.0, 0.1), 0.4, 0.3),
        Cue::HitGuard => (sweep(440.0, 660.0, 0.08), 0.3, 0.3),
        Cue::Drinking => (Shape::Notes { notes: &[523.0, 587.0, 523.0, 587.0], secs: 0.07 }, 0.1, 0.2),
        Cue::Mirror => (Shape::Notes { notes: &[1319.0, 1568.0, 1760.0, 2093.0], secs: 0.05 }, 0.0, 0.2),
        Cue::LooseWobble => (sweep(250.0, 230.0, 0.05), 0.8, 0.2),
        Cue::LooseCrash => (sweep(300.0, 80.0, 0.2), 0.8, 0.35),
    };
    Voice { shape, noise, volume }
}

// ════════════════════════════════════════════════════════════
//  Public API: the stub when the sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play(&self, _cue: Cue) {}
}
