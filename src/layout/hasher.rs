//! Content hash for layouts using BLAKE3
//!
//! LayoutHash = hash("layout" || section_count || for each section:
//!     pattern_len || pattern || context || alt_flag || intent || density || scale || role ||
//!     module_count)
//!
//! Section ids and free text are deliberately excluded: two attempts that arrive at the same
//! structure with freshly generated ids must hash equal so oscillation is detectable.

use super::section::Section;
use super::Layout;
use blake3::Hasher;

/// 32-byte BLAKE3 digest
pub type Hash = [u8; 32];

pub fn layout_hash(layout: &Layout) -> Hash {
    let mut hasher = Hasher::new();

    // Hash type discriminator
    hasher.update(b"layout");
    hasher.update(&(layout.sections.len() as u64).to_be_bytes());

    for section in &layout.sections {
        hash_section(&mut hasher, section);
    }

    *hasher.finalize().as_bytes()
}

fn hash_section(hasher: &mut Hasher, section: &Section) {
    let pattern = section.pattern.as_bytes();
    hasher.update(&(pattern.len() as u64).to_be_bytes());
    hasher.update(pattern);

    update_field(hasher, Some(section.context().as_str()));
    hasher.update(&[section.background.use_alt as u8]);
    update_field(hasher, section.visual_intent.map(|v| v.as_str()));
    update_field(hasher, section.visual_density.map(|v| v.as_str()));
    update_field(hasher, section.visual_scale.map(|v| v.as_str()));
    update_field(hasher, section.narrative_role.map(|v| v.as_str()));

    hasher.update(&(section.module_count() as u64).to_be_bytes());
}

/// Absent fields hash as a single zero byte so `None` never collides with a value.
fn update_field(hasher: &mut Hasher, value: Option<&str>) {
    match value {
        Some(v) => {
            hasher.update(&[1]);
            hasher.update(&(v.len() as u64).to_be_bytes());
            hasher.update(v.as_bytes());
        }
        None => {
            hasher.update(&[0]);
        }
    }
}

/// Lowercase hex rendering for logs and telemetry.
pub fn to_hex(hash: &Hash) -> String {
    hex::encode(hash)
}
