//! Governance proposals.
//!
//! Proposals still in their voting period carry a stale embedded tally, so
//! the poller fetches a live one for each of them first and hands the
//! results in here. Everything below is pure.

use super::Indexed;
use serde_json::Value;
use std::collections::HashMap;
use strata_core::chain::{RawProposal, TallyResult};
use strata_core::{ProposalRecord, StrataError, StrataResult};

/// Human-readable fields pulled out of a proposal's content payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProposalMetadata {
    pub title: String,
    pub description: String,
}

/// Reads `title`/`description` from the content payload.
///
/// Legacy content carries them as top-level fields. Newer proposals carry a
/// `metadata` string holding a JSON document with `title` and either
/// `description` or `summary`.
pub fn extract_metadata(content: Option<&Value>) -> StrataResult<ProposalMetadata> {
    let content = content
        .and_then(Value::as_object)
        .ok_or_else(|| StrataError::InvalidInput("proposal has no content object".into()))?;

    if let (Some(title), Some(description)) = (
        content.get("title").and_then(Value::as_str),
        content.get("description").and_then(Value::as_str),
    ) {
        return Ok(ProposalMetadata {
            title: title.to_owned(),
            description: description.to_owned(),
        });
    }

    let raw = content
        .get("metadata")
        .and_then(Value::as_str)
        .ok_or_else(|| StrataError::InvalidInput("content has neither title nor metadata".into()))?;
    let doc: Value = serde_json::from_str(raw)
        .map_err(|e| StrataError::InvalidInput(format!("metadata is not JSON: {e}")))?;

    let title = doc.get("title").and_then(Value::as_str);
    let description = doc
        .get("description")
        .or_else(|| doc.get("summary"))
        .and_then(Value::as_str);

    match (title, description) {
        (Some(title), Some(description)) => Ok(ProposalMetadata {
            title: title.to_owned(),
            description: description.to_owned(),
        }),
        _ => Err(StrataError::InvalidInput(
            "metadata lacks title or description".into(),
        )),
    }
}

fn type_url(content: Option<&Value>) -> String {
    content
        .and_then(|c| c.get("@type"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

/// Picks the tally shown for a proposal: live while voting, final afterwards.
///
/// A voting proposal without a live tally (its fetch failed) shows zeros.
pub fn select_tally(proposal: &RawProposal, live: &HashMap<u64, TallyResult>) -> TallyResult {
    if proposal.status.is_voting() {
        live.get(&proposal.proposal_id).cloned().unwrap_or_default()
    } else {
        proposal.final_tally_result.clone()
    }
}

/// Ids of proposals that need a live tally fetched before transforming.
pub fn voting_ids(raw: &[RawProposal]) -> Vec<u64> {
    raw.iter()
        .filter(|p| p.status.is_voting())
        .map(|p| p.proposal_id)
        .collect()
}

pub fn transform_proposals(
    raw: &[RawProposal],
    live_tallies: &HashMap<u64, TallyResult>,
) -> StrataResult<Indexed<ProposalRecord>> {
    let mut out = Indexed::with_capacity(raw.len());
    for p in raw {
        let metadata = match extract_metadata(p.content.as_ref()) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(proposal_id = p.proposal_id, error = %e, "proposal metadata unavailable");
                ProposalMetadata::default()
            }
        };

        let record = ProposalRecord {
            proposal_id: p.proposal_id,
            type_url: type_url(p.content.as_ref()),
            title: metadata.title,
            description: metadata.description,
            status: p.status,
            final_vote: select_tally(p, live_tallies),
            submit_time: p.submit_time,
            deposit_end_time: p.deposit_end_time,
            total_deposit: p.total_deposit.clone(),
            voting_start_time: p.voting_start_time,
            voting_end_time: p.voting_end_time,
        };
        out.insert(p.proposal_id.to_string(), record)?;
    }
    Ok(out)
}
