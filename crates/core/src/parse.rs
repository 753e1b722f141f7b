/// Splits the raw comma-separated check-name input into tracked names.
///
/// Total over all inputs: the empty string parses to no names, a comma-free
/// string is one name taken verbatim, anything else is a literal split on
/// `,`. Segments are never trimmed.
pub fn check_names_as_list(input: &str) -> Vec<String> {
    if input.is_empty() {
        return Vec::new();
    }

    if !input.contains(',') {
        return vec![input.to_string()];
    }

    input.split(',').map(str::to_string).collect()
}
