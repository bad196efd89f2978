use crate::store::Store;
use rand::{
    rngs::{adapter::ReseedingRng, OsRng},
    Rng, SeedableRng,
};
use rand_chacha::ChaCha20Core;
use std::sync::Arc;

pub trait StateTrait: Send + Sync + Clone + 'static {
    type Store: Store;
    type Rand: Rng + Send;

    fn store(&self) -> &Self::Store;
    fn rng(&self) -> Self::Rand;
}

pub struct State<St> {
    store: St,
}

impl<St: Store> State<St> {
    pub fn with_store(store: St) -> Arc<Self> {
        Arc::new(Self { store })
    }
}

thread_local! {
    static CHACHA_THREAD_RNG: ReseedingRng<ChaCha20Core, OsRng> = {
        let rng = ChaCha20Core::from_entropy();
        ReseedingRng::new(rng, 1024*64, OsRng)
    }
}

impl<St: Store> StateTrait for Arc<State<St>> {
    type Store = St;
    type Rand = ReseedingRng<ChaCha20Core, OsRng>;

    fn store(&self) -> &Self::Store {
        &self.store
    }

    fn rng(&self) -> Self::Rand {
        CHACHA_THREAD_RNG.with(|x| x.clone())
    }
}
