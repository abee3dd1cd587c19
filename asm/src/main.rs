use color_print::{cformat, cprintln};
use tpasm::{
    error::Error,
    line::{self, Line},
    macros::{self, MacroTables},
    report, Msgs,
};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input files
    #[clap(default_value = "main.asm")]
    input: Vec<String>,

    /// Output file
    #[clap(short, long, default_value = "main.asm.out")]
    output: String,

    /// Expand macros before assembling
    #[clap(short, long)]
    macros: bool,

    /// Dump source, intermediate and machine code side by side
    #[clap(short, long)]
    dump: bool,

    /// Dump symbol, literal and pool tables
    #[clap(short, long)]
    tables: bool,

    /// Write the full listing as YAML
    #[clap(short, long)]
    listing: Option<String>,
}

fn main() {
    use clap::Parser;

    let args: Args = Args::parse();
    println!("Two-Pass Assembler");

    match run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            cprintln!("<red,bold>error</>: {}", err);
            std::process::exit(1);
        }
    }
}

/// Returns whether the program assembled without errors.
fn run(args: &Args) -> Result<bool, Error> {
    use std::io::Write;

    println!("1. Read Files");
    let mut lines: Vec<Line> = vec![];
    for path in &args.input {
        println!("  < {}", path);
        lines.extend(line::read_file(path)?);
    }

    let mut msgs = Msgs::new();
    let mut macro_tables: Option<MacroTables> = None;
    if args.macros {
        println!("   Expand Macros");
        let expansion = macros::expand(&lines);
        println!(
            "  - {} macro(s), {} line(s) after expansion",
            expansion.tables.mnt.len(),
            expansion.lines.len()
        );
        msgs.extend(expansion.msgs);
        lines = expansion.lines;
        macro_tables = Some(expansion.tables);
    }

    println!("2. Pass 1 & Pass 2");
    let asm = tpasm::assemble(&lines);
    println!(
        "  - {} symbol(s), {} literal(s), {} pool(s)",
        asm.ctx.symbols.len(),
        asm.ctx.literals.len(),
        asm.ctx.literals.pools().len()
    );
    let unresolved: Vec<&str> = asm.ctx.symbols.unresolved().collect();
    if !unresolved.is_empty() {
        println!("  - unresolved: {}", unresolved.join(", "));
    }
    msgs.extend(asm.msgs.clone());
    msgs.dump();

    println!("3. Write Machine Code");
    println!("  > {}", &args.output);
    let mut file = std::fs::File::create(&args.output)
        .map_err(|e| Error::FileCreate(args.output.clone(), e))?;
    for code in asm.machine_code() {
        writeln!(file, "{}", code).map_err(|e| Error::FileWrite(args.output.clone(), e))?;
    }

    if let Some(path) = &args.listing {
        println!("  > {}", path);
        report::Listing::new(&asm, macro_tables.as_ref()).write(path)?;
    }

    if args.dump {
        report::print_listing(&asm);
    }
    if args.tables {
        report::print_symbols(&asm.ctx.symbols);
        report::print_literals(&asm.ctx.literals);
        if let Some(tables) = &macro_tables {
            report::print_macros(tables);
        }
    }

    let errors = msgs.count(tpasm::msg::Level::Error);
    let warns = msgs.count(tpasm::msg::Level::Warn);
    if errors > 0 {
        println!("{}", cformat!("<r,s>Failed</>: {} error(s), {} warning(s)", errors, warns));
    } else {
        println!("{}", cformat!("<g,s>Done</>: {} warning(s)", warns));
    }
    Ok(errors == 0)
}
