pub mod history;
pub mod rule;
pub mod template;

pub use history::{MatchHistoryLog, NewMatchHistoryLog, ParticipantResult, Winner};
pub use rule::{
    EqualShareConfig, FixedListConfig, NewPrizeRule, PrizeRule, RankKillConfig, RuleConfig,
};
pub use template::{MatchTemplate, MatchType, NewMatchTemplate};
