// Core services. Each owns one slice of the domain's rules; all of them
// talk to the same storage port and nothing else.

pub mod bulletin;
pub mod capacity;
pub mod directory;
pub mod engagement;
pub mod membership;
pub mod timeline;

pub use bulletin::BulletinBoard;
pub use capacity::CapacityLedger;
pub use directory::{EventDirectory, SearchResults, SEARCH_RESULT_CAP};
pub use engagement::{EngagementService, SaveState, ToggleReserve};
pub use membership::MembershipRegistry;
pub use timeline::{classify, TimeLabel};
