use crate::error::TranslateError;
use crate::model::{ExternalNetwork, TagExpression};

const EXTERNAL_NETWORK_IDENTITY: &str = "$identity=externalnetwork";
const NAMESPACE_PREFIX: &str = "$namespace=";
const ID_PREFIX: &str = "$id=";
const DOLLAR_PREFIX: &str = "$";
const VERSION_V2: &str = "version=v2";

/// Evaluates one AND-group of tags against an external network's
/// associated tags. A `$identity=` tag that isn't `$identity=externalnetwork`
/// targets some other kind of object, so the whole conjunction fails (it
/// couldn't have matched an external network in the first place).
/// `$namespace=`/`$id=` are wildcards. Any other `$`-prefixed tag is
/// unsupported and fatal.
pub fn external_networks_match_tags(
    extnet: &ExternalNetwork,
    conjunction: &[String],
) -> Result<bool, TranslateError> {
    for tag in conjunction {
        if tag.to_lowercase().starts_with("$identity=") {
            if !tag.eq_ignore_ascii_case(EXTERNAL_NETWORK_IDENTITY) {
                return Ok(false);
            }
            continue;
        }

        if tag.starts_with(NAMESPACE_PREFIX) || tag.starts_with(ID_PREFIX) {
            continue;
        }

        if tag.starts_with(DOLLAR_PREFIX) {
            return Err(TranslateError::UnknownDollarTag(tag.clone()));
        }

        if !extnet.associated_tags.iter().any(|etag| etag == tag) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Returns the external networks matching any disjunct of `objects` (an OR
/// of the per-extnet AND-group evaluation), in the order they appear in
/// `extnets`. Each match is deep-copied with `version=v2` appended to its
/// associated tags so the caller's mutation never aliases the input list.
pub fn matching_external_networks(
    objects: &TagExpression,
    extnets: &[ExternalNetwork],
) -> Result<Vec<ExternalNetwork>, TranslateError> {
    let mut matches = Vec::new();

    for extnet in extnets {
        let mut matched = false;
        for conjunction in objects {
            if external_networks_match_tags(extnet, conjunction)? {
                matched = true;
                break;
            }
        }
        if matched {
            let mut copy = extnet.deep_copy();
            copy.associated_tags.push(VERSION_V2.to_string());
            matches.push(copy);
        }
    }

    Ok(matches)
}
