//! C2: package-manager shortcut rewriting (`<pm>:<script>` -> `<pm> run <script>`).

const SHORTCUT_MANAGERS: &[&str] = &["npm", "pnpm", "yarn", "bun"];

/// Rewrite a `<pm>:<script>` shortcut into `<pm> run <script>`. Any other input, including
/// one that already uses the `run` form, or a bare `pm script` without a colon, passes
/// through untouched.
pub fn expand(command: &str) -> String {
    for pm in SHORTCUT_MANAGERS {
        if let Some(rest) = command.strip_prefix(pm).and_then(|r| r.strip_prefix(':')) {
            if rest.is_empty() {
                continue;
            }
            return format!("{pm} run {rest}");
        }
    }
    command.to_string()
}
