//! formplate's main application entry point and orchestration logic.
//! Handles command-line argument parsing, the submission flow, and coordinates
//! interactions between the different modules.

use formplate::{
    cli::{get_args, Args},
    config::get_document,
    error::{default_error_handler, Error, Result},
    expand::{decode_entities, WildcardRenderer},
    logger::init_logger,
    processor::Processor,
    prompt::{DialoguerPrompter, Prompter},
    registry::WildcardRegistry,
    sensitive::find_sensitive_term,
    submission::{collect_submission, get_submission_from},
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Prints the wildcard inventory with usage marks, then applies the save gate.
fn print_wildcards(registry: &WildcardRegistry) -> Result<()> {
    for entry in registry.entries() {
        let mark = if entry.used { "used" } else { "unused" };
        println!("{:<40} {}", entry.wildcard.placeholder(), mark);
    }
    if registry.has_dataset_wildcards() {
        println!();
        println!("Repeating groups render once per row between their {{@START_...@}} and {{@END_...@}} markers.");
    }
    registry.ensure_saveable()
}

/// Main application logic execution.
///
/// # Arguments
/// * `args` - Parsed command line arguments
///
/// # Returns
/// * `Result<()>` - Success or error status of rendering
///
/// # Flow
/// 1. Loads the form document
/// 2. Lists wildcards and stops, when asked to
/// 3. Confirms forms that look like they collect secrets
/// 4. Reads or collects the submission
/// 5. Renders title and content
fn run(args: Args) -> Result<()> {
    let document = get_document(&args.form)?;

    if args.wildcards {
        let registry =
            WildcardRegistry::new(&document.schema, &decode_entities(&document.template));
        return print_wildcards(&registry);
    }

    let prompter = DialoguerPrompter::new();

    if !args.skip_sensitive_check {
        if let Some(term) = find_sensitive_term(&document.raw_schema, &document.template) {
            log::warn!("Form '{}' looks like it asks for secrets ({})", document.name(), term);
            if args.stdin
                || !prompter.confirm("This form may collect sensitive information. Continue?", false)?
            {
                return Err(Error::SensitiveContent(format!(
                    "form '{}' matched '{}'",
                    document.name(),
                    term
                )));
            }
        }
    }

    let submission = match get_submission_from(args.stdin, args.submission)? {
        Some(submission) => submission,
        None => collect_submission(&prompter, &document.schema)?,
    };

    let renderer = WildcardRenderer::new();
    let processor = Processor::new(&renderer, &document);
    let output = processor.process(&submission);

    if let Some(title) = &output.title {
        println!("{}", title);
        println!();
    }
    println!("{}", output.content);
    if let Some(link) = document.link() {
        println!();
        println!("{}", link);
    }
    Ok(())
}
