//! Seeded random streams.
//!
//! Each subsystem draws from its own stream so adding a roll in one place
//! does not shift the outcomes of another.
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

/// Independent RNG streams derived from one user-visible seed.
#[derive(Debug, Clone)]
pub struct RngBundle {
    seed: u64,
    recruitment: CountingRng<ChaCha20Rng>,
    combat: CountingRng<ChaCha20Rng>,
    quests: CountingRng<ChaCha20Rng>,
    tavern: CountingRng<ChaCha20Rng>,
    events: CountingRng<ChaCha20Rng>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            seed,
            recruitment: CountingRng::new(derive_stream_seed(seed, b"recruitment")),
            combat: CountingRng::new(derive_stream_seed(seed, b"combat")),
            quests: CountingRng::new(derive_stream_seed(seed, b"quests")),
            tavern: CountingRng::new(derive_stream_seed(seed, b"tavern")),
            events: CountingRng::new(derive_stream_seed(seed, b"events")),
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Quality rolls for new recruits.
    pub fn recruitment(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.recruitment
    }

    /// Victory and casualty rolls.
    pub fn combat(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.combat
    }

    /// Daily quest board generation.
    pub fn quests(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.quests
    }

    /// Commander lottery.
    pub fn tavern(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.tavern
    }

    /// Random event triggers.
    pub fn events(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.events
    }

    /// Total draws across every stream.
    #[must_use]
    pub const fn total_draws(&self) -> u64 {
        self.recruitment
            .draws()
            .saturating_add(self.combat.draws())
            .saturating_add(self.quests.draws())
            .saturating_add(self.tavern.draws())
            .saturating_add(self.events.draws())
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<ChaCha20Rng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(&user_seed.to_le_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
