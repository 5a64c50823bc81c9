use super::tree::*;

/// Human-readable rendering of a result tree. Default methods give the
/// standard layout; implementors can override individual node styles.
pub trait Stringify {
    fn stringify(&mut self, node: &ResultNode) -> String {
        self.node(node, 0)
    }

    fn node(&mut self, node: &ResultNode, depth: usize) -> String {
        match node {
            ResultNode::Number(x) => self.str_number(x),
            ResultNode::Dice(x) => self.str_dice(x),
            ResultNode::BinaryOp(x) => self.str_binary(x),
            ResultNode::List(x) => self.str_list(x, depth),
            ResultNode::Sequence(x) => self.str_sequence(x, depth),
        }
    }

    fn str_number(&mut self, x: &NumberResult) -> String {
        x.value.to_string()
    }

    fn str_dice(&mut self, x: &DiceResult) -> String {
        format!("{} ({}) = {}", x.token, self.dice_faces(x), x.total)
    }

    /// The drawn faces in draw order: dropped faces struck through, faces
    /// selected by a keep directive bold, everything else plain.
    fn dice_faces(&mut self, x: &DiceResult) -> String {
        let mut remaining = x.dropped.clone();
        let mut parts = Vec::with_capacity(x.rolls.len());
        for &face in x.rolls.iter() {
            let dropped = match remaining.get_mut(&face) {
                Some(n) if *n > 0 => {
                    *n -= 1;
                    true
                }
                _ => false,
            };
            parts.push(if dropped {
                format!("~~{}~~", face)
            } else if x.keep_applied {
                format!("**{}**", face)
            } else {
                face.to_string()
            });
        }
        parts.join(", ")
    }

    fn str_binary(&mut self, x: &BinaryOpResult) -> String {
        format!(
            "({}) => ({} {} {}) => {} {} {} = {}",
            x.token,
            self.expand(&x.left),
            x.op,
            self.expand(&x.right),
            x.left.value(),
            x.op,
            x.right.value(),
            x.value,
        )
    }

    /// One-line expansion used inside the binary view: dice become their
    /// face list, nested operations keep their shape, leaves their value.
    fn expand(&mut self, node: &ResultNode) -> String {
        match node {
            ResultNode::Dice(x) => format!("[{}]", self.dice_faces(x)),
            ResultNode::BinaryOp(x) => format!(
                "({} {} {})",
                self.expand(&x.left),
                x.op,
                self.expand(&x.right)
            ),
            other => other.value().to_string(),
        }
    }

    fn str_list(&mut self, x: &ListResult, depth: usize) -> String {
        if depth > 0 {
            // One level of detail, then collapse. The implicit single-item
            // wrapper is transparent so its item's detail is not wasted on
            // it; an explicit count of one keeps its header.
            if x.implicit {
                if let [only] = x.items.as_slice() {
                    return self.node(only, depth);
                }
            }
            return format!("{} = {}", x.token, x.value);
        }

        let mut out = format!("{} = {}", x.token, x.value);
        for item in &x.items {
            out.push('\n');
            out.push_str(&indent(&self.node(item, depth + 1)));
        }
        out
    }

    fn str_sequence(&mut self, x: &SequenceResult, depth: usize) -> String {
        let mut out = format!("{} = {}", x.token, x.value);
        for item in &x.items {
            out.push('\n');
            out.push_str(&indent(&self.node(item, depth + 1)));
        }
        out
    }
}

fn indent(s: &str) -> String {
    s.lines()
        .map(|line| format!("  {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Default)]
pub struct TextStringifier;

impl TextStringifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stringify for TextStringifier {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Int;
    use crate::roll::roller::ScriptRoller;
    use crate::roll::RollContext;

    fn check(s: &str, script: Vec<Int>, expected: &str) {
        let ast = crate::parse(s).unwrap();
        let result = RollContext::new(ScriptRoller::new(script))
            .eval(&ast)
            .unwrap();
        let actual = TextStringifier::new().stringify(&result);
        assert_eq!(actual, expected, "input: {:?}", s);
    }

    #[test]
    fn test_stringify_arithmetic() {
        check("3+4", vec![], "3 + 4 = 7\n  (3 + 4) => (3 + 4) => 3 + 4 = 7");
        check("8/2", vec![], "8 / 2 = 4\n  (8 / 2) => (8 / 2) => 8 / 2 = 4.0");
    }

    #[test]
    fn test_stringify_dice() {
        check("2d20", vec![10, 11], "2d20 = 21\n  2d20 (10, 11) = 21");
        check(
            "4d6 dl1",
            vec![1, 2, 3, 4],
            "4d6dl1 = 9\n  4d6dl1 (~~1~~, 2, 3, 4) = 9",
        );
        check(
            "2d20kh1",
            vec![10, 11],
            "2d20kh1 = 11\n  2d20kh1 (~~10~~, **11**) = 11",
        );
    }

    #[test]
    fn test_stringify_binary_expansion() {
        check(
            "2d6 + 4",
            vec![3, 5],
            "2d6 + 4 = 12\n  (2d6 + 4) => ([3, 5] + 4) => 8 + 4 = 12",
        );
        // Tokens are canonical: "d8" prints as "1d8".
        check(
            "1.5*(d8 + 4)",
            vec![7],
            "1.5 * (1d8 + 4) = 16\n  (1.5 * (1d8 + 4)) => (1.5 * ([7] + 4)) => 1.5 * 11 = 16.5",
        );
    }

    #[test]
    fn test_stringify_lists() {
        check(
            "2 2d6",
            vec![3, 5, 2, 4],
            "2 2d6 = [8, 6]\n  2d6 (3, 5) = 8\n  2d6 (2, 4) = 6",
        );
        check(
            "2 2d6+6",
            vec![3, 3, 3, 3],
            "2 2d6 + 6 = [12, 12]\n  (2d6 + 6) => ([3, 3] + 6) => 6 + 6 = 12\n  (2d6 + 6) => ([3, 3] + 6) => 6 + 6 = 12",
        );
        // Nested lists collapse past the first level of detail.
        check(
            "2 3 d4",
            vec![1, 2, 3, 4, 2, 1],
            "2 3 1d4 = [[1, 2, 3], [4, 2, 1]]\n  3 1d4 = [1, 2, 3]\n  3 1d4 = [4, 2, 1]",
        );
        check("0 3d6", vec![], "0 3d6 = []");
    }

    #[test]
    fn test_explicit_count_of_one_keeps_its_header() {
        check(
            "2 1 d6",
            vec![4, 5],
            "2 1 1d6 = [[4], [5]]\n  1 1d6 = [4]\n  1 1d6 = [5]",
        );
    }

    #[test]
    fn test_stringify_sequences() {
        check(
            "1d20+5, 2d4",
            vec![13, 1, 3],
            "1d20 + 5, 2d4 = [18, 4]\n  (1d20 + 5) => ([13] + 5) => 13 + 5 = 18\n  2d4 (1, 3) = 4",
        );
    }
}
