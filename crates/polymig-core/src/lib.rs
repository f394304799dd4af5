pub mod algebra;
pub mod clock;
pub mod error;
pub mod expander;
pub mod export;
pub mod import;
pub mod matcher;
pub mod model;
pub mod port;
pub mod service_port;
pub mod translator;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ImportError, PortError, ServicePortError, TranslateError};
pub use export::to_pretty_json;
pub use import::{import_from_document, import_from_file, ImportDocument, ImportResult};
pub use model::{
    ApplyPolicyMode, ExternalNetwork, NetworkAccessPolicy, NetworkRule, NetworkRuleSetPolicy,
    PolicyAction, RuleAction, TagExpression,
};
pub use translator::convert_to_network_rule_set_policies;
