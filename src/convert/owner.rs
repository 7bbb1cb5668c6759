/// Map a fully qualified owner name to its zone-relative key: `@` for
/// the apex, otherwise the owner with the origin suffix stripped. An
/// owner outside the origin's subtree keeps its absolute name.
pub fn owner_key(owner: &str, origin: &str) -> String {
    let owner = owner.trim_end_matches('.');
    let origin = origin.trim_end_matches('.');

    if owner.eq_ignore_ascii_case(origin) {
        return "@".to_string();
    }

    let suffix = format!(".{}", origin.to_lowercase());
    let lowered = owner.to_lowercase();
    match lowered.strip_suffix(&suffix) {
        Some(relative) => relative.to_string(),
        None => lowered,
    }
}
