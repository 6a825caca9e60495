use std::{env, fs::read_to_string, rc::Rc, time::Instant};

use driftc::{
    display_error, infer::infer::infer, lexer::lexer::tokenize, parser::parser::parse,
    printer::print_node,
};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        panic!("Incorrect arguments provided!");
    }

    let file_path: &str = &args[1];
    let file_name = if file_path.contains('/') {
        file_path.split('/').last().unwrap()
    } else {
        file_path
    };

    let source = read_to_string(file_path).expect("Failed to read file!");

    let start = Instant::now();
    let tokens = tokenize(&source);
    println!("Tokenized in {:?}", start.elapsed());

    let parse_start = Instant::now();
    let parsed = parse(tokens, &source, Rc::new(String::from(file_name)));
    println!("Parsed in {:?}", parse_start.elapsed());

    let mut ast = match parsed {
        Ok(ast) => ast,
        Err(error) => {
            display_error(&error);
            std::process::exit(1);
        }
    };

    let infer_start = Instant::now();
    infer(&mut ast);
    println!("Inferred in {:?}", infer_start.elapsed());

    println!("{}", print_node(&ast));
    println!("Total time: {:?}", start.elapsed());
}
