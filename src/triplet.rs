use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::str::FromStr;

/// Extension of every triplet output file.
pub const OUTPUT_EXTENSION: &str = "wav";

/// Three digits identifying one generated clip, e.g. `"042"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triplet([u8; 3]);

impl Triplet {
    /// Number of distinct triplets.
    pub const SPACE: usize = 1000;

    /// Build a triplet from three digit values. Returns `None` if any value exceeds 9.
    pub fn new(digits: [u8; 3]) -> Option<Self> {
        digits.iter().all(|&d| d <= 9).then_some(Self(digits))
    }

    /// The triplet whose numeric value is `index` (`0..1000`).
    pub fn from_index(index: usize) -> Option<Self> {
        (index < Self::SPACE).then(|| {
            Self([
                (index / 100) as u8,
                (index / 10 % 10) as u8,
                (index % 10) as u8,
            ])
        })
    }

    pub fn all() -> impl Iterator<Item = Triplet> {
        (0..Self::SPACE).filter_map(Self::from_index)
    }

    pub fn digits(&self) -> [u8; 3] {
        self.0
    }

    /// Digit characters in order.
    pub fn chars(&self) -> [char; 3] {
        self.0.map(|d| char::from(b'0' + d))
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self, OUTPUT_EXTENSION)
    }

    /// Recognize an output file name such as `"042.wav"`.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let stem = name.strip_suffix(OUTPUT_EXTENSION)?.strip_suffix('.')?;
        stem.parse().ok()
    }
}

impl fmt::Display for Triplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.chars();
        write!(f, "{a}{b}{c}")
    }
}

impl FromStr for Triplet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_digit) {
            return Err(format!("Invalid triplet: {s:?}. Expected three digits"));
        }
        Ok(Self([bytes[0] - b'0', bytes[1] - b'0', bytes[2] - b'0']))
    }
}

/// Source of candidate triplets for a run.
pub trait TripletSampler {
    fn next_triplet(&mut self) -> Triplet;
}

/// Draws each digit uniformly and independently.
pub struct RandomSampler<R: Rng = StdRng> {
    rng: R,
}

impl RandomSampler<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible sampling from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> TripletSampler for RandomSampler<R> {
    fn next_triplet(&mut self) -> Triplet {
        let digits = [
            self.rng.gen_range(0..10),
            self.rng.gen_range(0..10),
            self.rng.gen_range(0..10),
        ];
        Triplet(digits)
    }
}

/// Replays a fixed list of triplets, starting over at the end.
///
/// Meant for tests and scripted runs. The list must contain enough triplets
/// without an output yet to reach the target: once every entry is handled the
/// sampler only repeats them, and a run with fewer than 1000 triplets handled
/// keeps drawing forever.
#[derive(Debug, Clone)]
pub struct SequenceSampler {
    sequence: Vec<Triplet>,
    position: usize,
}

impl SequenceSampler {
    /// Panics if `sequence` is empty.
    pub fn new(sequence: Vec<Triplet>) -> Self {
        assert!(!sequence.is_empty(), "SequenceSampler needs at least one triplet");
        Self {
            sequence,
            position: 0,
        }
    }

    /// Parse a list like `["042", "115"]`. Panics on an invalid entry.
    pub fn from_strs(items: &[&str]) -> Self {
        Self::new(
            items
                .iter()
                .map(|s| s.parse().unwrap_or_else(|e| panic!("{e}")))
                .collect(),
        )
    }
}

impl TripletSampler for SequenceSampler {
    fn next_triplet(&mut self) -> Triplet {
        let triplet = self.sequence[self.position];
        self.position = (self.position + 1) % self.sequence.len();
        triplet
    }
}

impl<T: TripletSampler + ?Sized> TripletSampler for &mut T {
    fn next_triplet(&mut self) -> Triplet {
        (**self).next_triplet()
    }
}
