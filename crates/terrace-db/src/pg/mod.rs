//! PostgreSQL repository implementations

mod deal;
mod team;

pub use deal::PgDealRepository;
pub use team::PgTeamRepository;

use crate::pool::DbPool;

/// Bundle of concrete repositories sharing one pool
#[derive(Clone)]
pub struct Repositories {
    pub deals: PgDealRepository,
    pub team: PgTeamRepository,
}

impl Repositories {
    /// Create repositories over a shared pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            deals: PgDealRepository::new(pool.clone()),
            team: PgTeamRepository::new(pool),
        }
    }
}
