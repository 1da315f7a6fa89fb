// SignatureGrouper — stage 4: states that share a ranking signature.

use crate::records::{RankingSignature, SignatureGroup, State};

use super::shuffle::Grouped;

#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureGrouper;

impl SignatureGrouper {
    /// One group per distinct signature. States stay in encounter order.
    pub fn group(&self, grouped: Grouped<RankingSignature, State>) -> Vec<SignatureGroup> {
        grouped
            .into_iter()
            .map(|(signature, states)| SignatureGroup { signature, states })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::shuffle::by_signature;
    use crate::records::StateSignature;

    fn ss(signature: &str, state: &str) -> StateSignature {
        StateSignature {
            state: State::new(state),
            signature: RankingSignature::from_canonical(signature),
        }
    }

    #[test]
    fn groups_by_identical_signature() {
        let sigs = vec![
            ss("sports>politics", "Utah"),
            ss("education>sports", "Iowa"),
            ss("sports>politics", "Ohio"),
        ];
        let groups = SignatureGrouper.group(by_signature(&sigs));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].signature.as_str(), "education>sports");
        assert_eq!(groups[1].states_joined(), "Utah,Ohio");
    }

    #[test]
    fn empty_in_empty_out() {
        assert!(SignatureGrouper.group(by_signature(&[])).is_empty());
    }
}
