mod presenter;

use clap::{Parser, Subcommand, ValueEnum};
use form_spec::{
    Control, ControlKind, FieldChange, FormController, FormDocument, FormValues, StaticTheme,
    document_schema, render_json_ui, render_text, validate,
};
use presenter::FieldPresenter;
use std::env;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Environment variable naming a theme file used when `--theme` is absent.
const THEME_ENV: &str = "DYNFORM_THEME";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Schema-driven form CLI",
    long_about = "Renders, checks, and fills forms described by a JSON field schema"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RenderMode {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Prompt for every field in order, then print the submitted values as JSON.
    Fill {
        /// Path to the form document JSON.
        #[arg(long, value_name = "FORM")]
        form: PathBuf,
        /// Optional JSON object with values applied before prompting.
        #[arg(long, value_name = "VALUES")]
        values: Option<PathBuf>,
        /// Theme JSON overriding the document theme (falls back to DYNFORM_THEME).
        #[arg(long, value_name = "THEME")]
        theme: Option<PathBuf>,
        /// Print the rendered form before prompting.
        #[arg(long, value_enum)]
        preview: Option<RenderMode>,
    },
    /// Render the form without prompting.
    Render {
        /// Path to the form document JSON.
        #[arg(long, value_name = "FORM")]
        form: PathBuf,
        /// Optional JSON object with values applied before rendering.
        #[arg(long, value_name = "VALUES")]
        values: Option<PathBuf>,
        /// Theme JSON overriding the document theme (falls back to DYNFORM_THEME).
        #[arg(long, value_name = "THEME")]
        theme: Option<PathBuf>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = RenderMode::Text)]
        format: RenderMode,
    },
    /// Check a form document's field schema.
    Check {
        /// Path to the form document JSON.
        #[arg(long, value_name = "FORM")]
        form: PathBuf,
    },
    /// Print the JSON Schema of form documents.
    Schema,
}

fn main() -> CliResult<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Fill {
            form,
            values,
            theme,
            preview,
        } => run_fill(form, values, theme, preview),
        Command::Render {
            form,
            values,
            theme,
            format,
        } => run_render(form, values, theme, format),
        Command::Check { form } => run_check(form),
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&document_schema())?);
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_document(path: &Path) -> CliResult<FormDocument> {
    let contents = fs::read_to_string(path)?;
    let document = FormDocument::from_json(&contents)?;
    debug!(path = %path.display(), fields = document.fields.len(), "loaded form document");
    Ok(document)
}

fn resolve_theme(flag: Option<PathBuf>, document: &FormDocument) -> CliResult<StaticTheme> {
    let path = flag.or_else(|| env::var_os(THEME_ENV).map(PathBuf::from));
    match path {
        Some(path) => {
            let contents = fs::read_to_string(&path)?;
            let theme: StaticTheme = serde_json::from_str(&contents)?;
            debug!(path = %path.display(), "theme override loaded");
            Ok(theme)
        }
        None => Ok(document.theme.clone().unwrap_or_default()),
    }
}

fn apply_initial_values(form: &mut FormController, path: Option<PathBuf>) -> CliResult<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let contents = fs::read_to_string(path)?;
    let values: FormValues = serde_json::from_str(&contents)?;
    for (name, value) in values.iter() {
        form.set_field_value(name, value.clone())?;
    }
    Ok(())
}

fn build_form(
    document: FormDocument,
    values: Option<PathBuf>,
    on_submit: impl FnMut(FormValues) + 'static,
) -> CliResult<FormController> {
    let schema = document.fields.into_shared();
    let mut form = FormController::with_schema(schema, document.submit_label, on_submit)?;
    apply_initial_values(&mut form, values)?;
    Ok(form)
}

fn run_render(
    form_path: PathBuf,
    values: Option<PathBuf>,
    theme: Option<PathBuf>,
    format: RenderMode,
) -> CliResult<()> {
    let document = load_document(&form_path)?;
    let theme = resolve_theme(theme, &document)?;
    let form = build_form(document, values, |_| {})?;
    print_render_output(format, &form, &theme)
}

fn print_render_output(
    format: RenderMode,
    form: &FormController,
    theme: &StaticTheme,
) -> CliResult<()> {
    let payload = form.render(theme);
    match format {
        RenderMode::Text => println!("{}", render_text(&payload)),
        RenderMode::Json => {
            let ui = render_json_ui(&payload);
            println!("{}", serde_json::to_string_pretty(&ui)?);
        }
    }
    Ok(())
}

fn run_check(form_path: PathBuf) -> CliResult<()> {
    let document = load_document(&form_path)?;
    let report = validate(&document.fields);
    println!(
        "Schema check: {} ({} field(s))",
        if report.valid { "valid" } else { "invalid" },
        document.fields.len()
    );
    for issue in &report.issues {
        println!(" - [{}] {}", issue.code, issue.message);
    }
    if report.valid {
        Ok(())
    } else {
        Err(format!("{} schema issue(s) found", report.issues.len()).into())
    }
}

fn run_fill(
    form_path: PathBuf,
    values: Option<PathBuf>,
    theme: Option<PathBuf>,
    preview: Option<RenderMode>,
) -> CliResult<()> {
    let document = load_document(&form_path)?;
    let theme = resolve_theme(theme, &document)?;
    let mut form = build_form(document, values, |submitted| {
        match serde_json::to_string_pretty(&submitted) {
            Ok(pretty) => println!("{}", pretty),
            Err(err) => eprintln!("Failed to serialize submitted values: {}", err),
        }
    })?;

    if let Some(mode) = preview {
        print_render_output(mode, &form, &theme)?;
    }

    let mut presenter = FieldPresenter::new(io::stderr());
    let stdin = io::stdin();
    let mut input = stdin.lock();
    fill_fields(&mut form, &theme, &mut input, &mut presenter)?;

    presenter.show_submit(form.submit_label())?;
    form.submit();
    Ok(())
}

/// Prompt for each field in schema order, applying accepted input.
fn fill_fields<R: BufRead, W: io::Write>(
    form: &mut FormController,
    theme: &StaticTheme,
    input: &mut R,
    presenter: &mut FieldPresenter<W>,
) -> CliResult<()> {
    let names = form
        .fields()
        .iter()
        .map(|field| field.name.clone())
        .collect::<Vec<_>>();
    let total = names.len();

    for (position, name) in names.iter().enumerate() {
        loop {
            let payload = form.render(theme);
            presenter.show_header(&payload)?;
            let control = payload
                .control(name)
                .ok_or_else(|| format!("form is missing field '{}'", name))?;
            presenter.show_prompt(position + 1, total, control)?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Err("input ended before the form was complete".into());
            }
            let raw = line.trim_end_matches(['\r', '\n']);
            if raw.trim().eq_ignore_ascii_case("exit") {
                return Err("form aborted by user".into());
            }

            match parse_input(control, raw) {
                Ok(Some(change)) => {
                    form.apply(change)?;
                    break;
                }
                Ok(None) => break,
                Err(message) => presenter.show_input_error(&message)?,
            }
        }
    }
    Ok(())
}

/// Turn one line of user input into a change for `control`.
/// Blank input keeps the current value.
fn parse_input(control: &Control, raw: &str) -> Result<Option<FieldChange>, String> {
    if raw.trim().is_empty() {
        return Ok(None);
    }

    match &control.kind {
        ControlKind::TextInput { .. } => control
            .edit(raw)
            .map(Some)
            .map_err(|err| err.to_string()),
        ControlKind::MultiLineInput { .. } => control
            .edit(raw.replace("\\n", "\n"))
            .map(Some)
            .map_err(|err| err.to_string()),
        ControlKind::Picker { options, .. } => {
            let wanted = raw.trim();
            let index = options
                .iter()
                .position(|option| option.value.to_string().eq_ignore_ascii_case(wanted))
                .or_else(|| {
                    options
                        .iter()
                        .position(|option| option.label.eq_ignore_ascii_case(wanted))
                })
                .or_else(|| {
                    wanted
                        .parse::<usize>()
                        .ok()
                        .filter(|position| (1..=options.len()).contains(position))
                        .map(|position| position - 1)
                });
            match index {
                Some(index) => control
                    .choose(index)
                    .map(Some)
                    .map_err(|err| err.to_string()),
                None if options.is_empty() => Err("this field has no options".to_string()),
                None => Err(format!(
                    "choose one of: {}",
                    options
                        .iter()
                        .map(|option| option.label.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_cmd::Command;
    use form_spec::{FieldDescriptor, FieldType, FieldValue, SelectOption, render_field};
    use serde_json::{Value, json};
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::rc::Rc;

    const FIXTURE: &str =
        include_str!("../../form-spec/tests/fixtures/candidate_registration.json");

    fn control(field: FieldDescriptor, value: &str) -> Control {
        render_field(&StaticTheme::default(), &field, &FieldValue::from(value))
    }

    fn remote_days() -> FieldDescriptor {
        FieldDescriptor::new("remote", "Remote", FieldType::Select).with_options([
            SelectOption::new(0i64, "None"),
            SelectOption::new(2i64, "Two"),
        ])
    }

    #[test]
    fn parse_input_keeps_value_on_blank_line() {
        let field = FieldDescriptor::new("first", "First", FieldType::Text);
        assert_eq!(parse_input(&control(field, "Ada"), "   "), Ok(None));
    }

    #[test]
    fn parse_input_keeps_numbers_as_text() {
        let field = FieldDescriptor::new("age", "Age", FieldType::Number);
        let change = parse_input(&control(field, ""), "34").unwrap().unwrap();
        assert_eq!(change.value, FieldValue::Text("34".into()));
    }

    #[test]
    fn parse_input_expands_line_breaks_for_long_text() {
        let field = FieldDescriptor::new("bio", "Bio", FieldType::LongText);
        let change = parse_input(&control(field, ""), "line one\\nline two")
            .unwrap()
            .unwrap();
        assert_eq!(change.value, FieldValue::from("line one\nline two"));
    }

    #[test]
    fn parse_input_accepts_index_value_or_label_for_select() {
        let picker = control(remote_days(), "");
        let by_index = parse_input(&picker, "2").unwrap().unwrap();
        let by_label = parse_input(&picker, "two").unwrap().unwrap();
        let by_value = parse_input(&picker, "0").unwrap().unwrap();
        assert_eq!(by_index.value, FieldValue::from(2i64));
        assert_eq!(by_label.value, FieldValue::from(2i64));
        assert_eq!(by_value.value, FieldValue::from(0i64));
        assert!(parse_input(&picker, "seven").is_err());
    }

    #[test]
    fn parse_input_prefers_option_value_over_position() {
        let field = FieldDescriptor::new("rating", "Rating", FieldType::Select).with_options([
            SelectOption::new(5i64, "Five"),
            SelectOption::new(1i64, "One"),
        ]);
        let picker = control(field, "");
        let by_value = parse_input(&picker, "1").unwrap().unwrap();
        let by_position = parse_input(&picker, "2").unwrap().unwrap();
        assert_eq!(by_value.value, FieldValue::from(1i64));
        assert_eq!(by_position.value, FieldValue::from(1i64));
    }

    #[test]
    fn fill_fields_reprompts_after_bad_choice() {
        let submitted: Rc<RefCell<Option<FormValues>>> = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&submitted);
        let schema = form_spec::FieldSchema::new(vec![
            FieldDescriptor::new("first", "First", FieldType::Text).with_value("Ada"),
            remote_days(),
        ])
        .into_shared();
        let mut form = FormController::with_schema(schema, "Save", move |values| {
            *sink.borrow_mut() = Some(values);
        })
        .expect("bind");

        let mut input = Cursor::new("\nmaybe\n1\n");
        let mut output = Vec::new();
        let mut presenter = FieldPresenter::new(&mut output);
        fill_fields(&mut form, &StaticTheme::default(), &mut input, &mut presenter)
            .expect("fill");
        form.submit();

        let values = submitted.borrow().clone().expect("submitted");
        assert_eq!(values.to_json(), json!({ "first": "Ada", "remote": 0 }));
        let transcript = String::from_utf8(output).expect("utf8");
        assert!(transcript.contains("Invalid input: choose one of: None, Two"));
    }

    #[test]
    fn fill_fields_fails_when_input_runs_out() {
        let schema = form_spec::FieldSchema::new(vec![FieldDescriptor::new(
            "first",
            "First",
            FieldType::Text,
        )])
        .into_shared();
        let mut form = FormController::with_schema(schema, "Save", |_| {}).expect("bind");
        let mut input = Cursor::new("");
        let mut presenter = FieldPresenter::new(Vec::new());
        let result = fill_fields(&mut form, &StaticTheme::default(), &mut input, &mut presenter);
        assert!(result.is_err());
    }

    #[test]
    fn fill_command_prints_submitted_values() -> Result<(), Box<dyn std::error::Error>> {
        let workspace = assert_fs::TempDir::new()?;
        let form_path = workspace.path().join("form.json");
        fs::write(&form_path, FIXTURE)?;
        let answers = [
            "Ada",
            "Lovelace",
            "ada@example.com",
            "secret",
            "36",
            "London",
            "",
            "Analyst\\nMathematician",
            "senior",
            "",
        ];
        let stdin = format!("{}\n", answers.join("\n"));

        let output = Command::cargo_bin("dynform")?
            .arg("fill")
            .arg("--form")
            .arg(&form_path)
            .env_remove(THEME_ENV)
            .write_stdin(stdin)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let values: Value = serde_json::from_slice(&output)?;
        assert_eq!(values["firstName"], "Ada");
        assert_eq!(values["age"], "36");
        assert_eq!(values["country"], "France");
        assert_eq!(values["bio"], "Analyst\nMathematician");
        assert_eq!(values["experience"], "senior");
        assert_eq!(values["remoteDays"], 2);
        Ok(())
    }

    #[test]
    fn fill_command_applies_values_file() -> Result<(), Box<dyn std::error::Error>> {
        let workspace = tempfile::TempDir::new()?;
        let form_path = workspace.path().join("form.json");
        let values_path = workspace.path().join("values.json");
        fs::write(&form_path, FIXTURE)?;
        fs::write(
            &values_path,
            json!({ "firstName": "Grace", "city": "Arlington" }).to_string(),
        )?;
        let stdin = "\n".repeat(10);

        let output = Command::cargo_bin("dynform")?
            .args(["fill", "--form"])
            .arg(&form_path)
            .arg("--values")
            .arg(&values_path)
            .env_remove(THEME_ENV)
            .write_stdin(stdin)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let values: Value = serde_json::from_slice(&output)?;
        assert_eq!(values["firstName"], "Grace");
        assert_eq!(values["city"], "Arlington");
        assert_eq!(values["lastName"], "");
        Ok(())
    }

    #[test]
    fn check_command_fails_on_duplicate_names() -> Result<(), Box<dyn std::error::Error>> {
        let workspace = assert_fs::TempDir::new()?;
        let form_path = workspace.path().join("dup.json");
        let document = json!({
            "fields": [
                { "name": "email", "label": "Email", "type": "text" },
                { "name": "email", "label": "Email again", "type": "text" }
            ]
        });
        fs::write(&form_path, document.to_string())?;

        let output = Command::cargo_bin("dynform")?
            .arg("check")
            .arg("--form")
            .arg(&form_path)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        let stdout = String::from_utf8(output)?;
        assert!(stdout.contains("Schema check: invalid"));
        assert!(stdout.contains("[duplicate_name]"));
        Ok(())
    }

    #[test]
    fn render_command_outputs_json_ui() -> Result<(), Box<dyn std::error::Error>> {
        let workspace = assert_fs::TempDir::new()?;
        let form_path = workspace.path().join("form.json");
        let theme_path = workspace.path().join("theme.json");
        fs::write(&form_path, FIXTURE)?;
        fs::write(
            &theme_path,
            json!({ "colors": { "placeholder": "#000000" } }).to_string(),
        )?;

        let output = Command::cargo_bin("dynform")?
            .args(["render", "--format", "json", "--form"])
            .arg(&form_path)
            .arg("--theme")
            .arg(&theme_path)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let ui: Value = serde_json::from_slice(&output)?;
        assert_eq!(ui["state"], "initialized");
        assert_eq!(ui["submit"]["label"], "Register");
        assert_eq!(ui["fields"][0]["style"]["border_color"], "#000000");
        Ok(())
    }
}
