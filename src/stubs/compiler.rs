/// Stand-in for a C++ compiler, run as `sh <script> <source> -o <artifact>`.
///
/// Sources are shell scripts: they are copied to the artifact path and made
/// executable. Sources containing `COMPILE_ERROR` are rejected with a g++-like
/// diagnostic, sources containing `COMPILE_HANG` stall the compiler.
pub const FAKE_CC: &str = r#"
src="$1"
out="$3"
if grep -q COMPILE_ERROR "$src"; then
    echo "$src: error: expected ';' before 'return'" >&2
    exit 1
fi
if grep -q COMPILE_HANG "$src"; then
    sleep 10
fi
cp "$src" "$out" && chmod +x "$out"
"#;
