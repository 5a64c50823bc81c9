use rolltree::RenderFormat;

fn main() {
    let mut verbose = false;
    let mut words = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "-v" || arg == "--verbose" {
            verbose = true;
        } else {
            words.push(arg);
        }
    }

    let roll_string = if words.is_empty() {
        String::from("1d20")
    } else {
        words.join(" ")
    };

    match rolltree::evaluate(&roll_string) {
        Ok(result) => {
            if verbose {
                println!("{}", result.render(RenderFormat::Text));
            } else {
                println!("{}", result.raw_result());
            }
        }
        Err(why) => {
            println!("Could not process roll string {}", roll_string);
            println!("Error: {}", why);
        }
    }
}
