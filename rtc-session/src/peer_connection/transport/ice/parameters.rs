use serde::{Deserialize, Serialize};

/// Local ICE credentials of one ICE generation.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RTCIceParameters {
    #[serde(skip)]
    pub generation: u32,
    pub username_fragment: String,
    pub password: String,
}

impl RTCIceParameters {
    pub(crate) fn generate(generation: u32) -> Self {
        RTCIceParameters {
            generation,
            username_fragment: shared::util::generate_ufrag(),
            password: shared::util::generate_pwd(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_generate_ice_parameters() {
        let first = RTCIceParameters::generate(1);
        let second = RTCIceParameters::generate(2);

        assert_eq!(first.generation, 1);
        assert_eq!(first.username_fragment.len(), 16);
        assert_eq!(first.password.len(), 32);
        assert_ne!(first.username_fragment, second.username_fragment);
        assert_ne!(first.password, second.password);

        let json = serde_json::to_string(&first).expect("serialize");
        assert!(json.contains("usernameFragment"));
        assert!(!json.contains("generation"));
    }
}
