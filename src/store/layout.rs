//! On-disk layout of the trail store
//!
//! ```text
//! <root>/
//!     sessions.json
//!     settings.json
//!     default/
//!         path_data_<map>_minecraft_overworld.bin
//!         path_data_<map>_minecraft_the_nether.bin
//!         path_data_<map>_minecraft_the_end.bin
//! ```

use lazy_regex::{regex_captures, regex_is_match};

use crate::trail::SpatialDomain;

pub const SESSIONS_FILE: &str = "sessions.json";
pub const SETTINGS_FILE: &str = "settings.json";
pub const DEFAULT_SESSION: &str = "default";

pub const TRAIL_EXT: &str = "bin";
pub const LEGACY_EXT: &str = "json";

/// Map identifiers can be server addresses; keep them to a single path component
pub fn sanitize_map_id(map_id: &str) -> String {
    map_id.replace([':', '/', '\\'], "_")
}

/// File name of one domain's trail under a session directory
pub fn trail_file_name(map_id: &str, domain: SpatialDomain, ext: &str) -> String {
    format!("path_data_{}_{}.{}", sanitize_map_id(map_id), domain.id(), ext)
}

/// Split a trail file name back into its (sanitized) map id and domain
pub fn parse_trail_file_name(file_name: &str) -> Option<(String, SpatialDomain, &str)> {
    let (_, map_id, domain_id, ext) =
        regex_captures!(r"^path_data_(.+)_(minecraft_overworld|minecraft_the_nether|minecraft_the_end)\.(bin|json)$", file_name)?;
    let domain = SpatialDomain::from_id(domain_id)?;
    Some((map_id.to_string(), domain, ext))
}

/// Session names become directory names
pub fn is_valid_session_name(name: &str) -> bool {
    name != "." && name != ".." && regex_is_match!(r"^[A-Za-z0-9_.\-]+$", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_file_name() {
        assert_eq!(
            trail_file_name("My World", SpatialDomain::Overworld, TRAIL_EXT),
            "path_data_My World_minecraft_overworld.bin"
        );
        assert_eq!(
            trail_file_name("play.example.net:25565", SpatialDomain::End, LEGACY_EXT),
            "path_data_play.example.net_25565_minecraft_the_end.json"
        );
    }

    #[test]
    fn test_parse_trail_file_name() {
        let (map, domain, ext) = parse_trail_file_name("path_data_world_1_minecraft_the_nether.bin").unwrap();
        assert_eq!(map, "world_1");
        assert_eq!(domain, SpatialDomain::Nether);
        assert_eq!(ext, "bin");

        assert!(parse_trail_file_name("path_data_world_minecraft_moon.bin").is_none());
        assert!(parse_trail_file_name("settings.json").is_none());
    }

    #[test]
    fn test_session_names() {
        assert!(is_valid_session_name("default"));
        assert!(is_valid_session_name("run-2.speed_1"));
        assert!(!is_valid_session_name(""));
        assert!(!is_valid_session_name(".."));
        assert!(!is_valid_session_name("a/b"));
        assert!(!is_valid_session_name("with space"));
    }
}
