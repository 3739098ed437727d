//! Database service layer
//!
//! This module bundles the repositories over one shared pool

use crate::database::{DatabasePool, UserRepository, FairRepository, EventRepository, SlotRepository};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub fairs: FairRepository,
    pub events: EventRepository,
    pub slots: SlotRepository,
    pool: DatabasePool,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            fairs: FairRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            slots: SlotRepository::new(pool.clone()),
            pool,
        }
    }

    /// Underlying pool, for health checks and shutdown
    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }
}
