use crate::program::Program;

const INDENT: usize = 2;

/// Lay out program help: a heading, then one line per command followed by its
/// indented options, with every description starting at the same column
pub(crate) fn render<T>(program: &Program<T>) -> String {
    let commands = program.commands();

    let widest = commands
        .iter()
        .flat_map(|command| {
            std::iter::once(width(command.pattern())).chain(
                command
                    .options()
                    .iter()
                    .map(|option| width(&option.pattern) + INDENT),
            )
        })
        .max()
        .unwrap_or(0);
    let column = widest + INDENT;

    let heading = match program.version() {
        Some(version) => format!("{} {version}", program.name()),
        None => program.name().to_owned(),
    };
    let mut lines = vec![String::new(), heading, String::new()];
    if let Some(description) = program.description() {
        lines.push(description.to_owned());
        lines.push(String::new());
    }

    for command in commands {
        lines.push(line(column, command.pattern(), command.description()));
        for option in command.options() {
            let pattern = format!("{}{}", " ".repeat(INDENT), option.pattern);
            lines.push(line(column, &pattern, &option.description));
        }
    }

    let indent = " ".repeat(INDENT);
    let mut text = lines
        .iter()
        .map(|l| format!("{indent}{l}"))
        .collect::<Vec<_>>()
        .join("\n");
    text.push('\n');
    text
}

/// Padding in `format!` counts chars, not bytes
fn width(text: &str) -> usize {
    text.chars().count()
}

fn line(column: usize, pattern: &str, description: &str) -> String {
    format!("{pattern:<column$}{description}")
}
