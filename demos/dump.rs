use std::fmt::Write;

use cff_charstring::type2::{CharStringHandler, CharStringInterpreter, Operator, Point};

struct Dump(String);

impl CharStringHandler<f32> for Dump {
    fn move_to(&mut self, pt: Point<f32>) {
        writeln!(&mut self.0, "M {} {}", pt.x, pt.y).unwrap();
    }

    fn line_to(&mut self, pt: Point<f32>) {
        writeln!(&mut self.0, "L {} {}", pt.x, pt.y).unwrap();
    }

    fn curve_to(&mut self, pt1: Point<f32>, pt2: Point<f32>, pt3: Point<f32>) {
        writeln!(&mut self.0, "C {} {} {} {} {} {}", pt1.x, pt1.y, pt2.x, pt2.y, pt3.x, pt3.y).unwrap();
    }

    fn flush_op(&mut self, op: Operator, args: &[f32]) {
        writeln!(&mut self.0, "# {} {:?}", op, args).unwrap();
    }

    fn flush_hint_mask(&mut self, op: Operator, args: &[f32], mask: &[u8]) {
        writeln!(&mut self.0, "# {} {:?} {:02x?}", op, args, mask).unwrap();
    }
}

fn parse_hex(s: &str) -> Option<Vec<u8>> {
    let digits: Vec<u8> = s.bytes().filter(|c| !c.is_ascii_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return None;
    }

    digits
        .chunks(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair).ok()?;
            u8::from_str_radix(pair, 16).ok()
        })
        .collect()
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        println!("Usage:\n\tdump <charstring-hex>");
        std::process::exit(1);
    }

    let data = match parse_hex(&args.join("")) {
        Some(v) => v,
        None => {
            eprintln!("Error: invalid hex string.");
            std::process::exit(1);
        }
    };

    let subrs: &[&[u8]] = &[];
    let mut dump = Dump(String::new());
    let mut interpreter = CharStringInterpreter::<f32, _>::new(&data, subrs, subrs);
    let res = interpreter.interpret(&mut dump);
    print!("{}", dump.0);

    if let Err(e) = res {
        eprintln!("Error: {}.", e);
        std::process::exit(1);
    }
}
