use crate::parse::ast;

pub trait AstVisitor {
    type Output;

    fn visit<T: ?Sized>(&mut self, node: &T) -> Self::Output
    where
        T: Accept<Self>,
    {
        node.accept(self)
    }

    fn visit_number(&mut self, x: &ast::NumberLiteral) -> Self::Output;

    fn visit_dice(&mut self, x: &ast::DiceRoll) -> Self::Output;

    fn visit_binary(&mut self, x: &ast::BinaryOp) -> Self::Output;

    fn visit_list(&mut self, x: &ast::ListRepeat) -> Self::Output;

    fn visit_sequence(&mut self, x: &ast::Sequence) -> Self::Output;
}

pub trait Accept<V: AstVisitor + ?Sized> {
    fn accept(&self, v: &mut V) -> V::Output;
}

impl<V: AstVisitor + ?Sized> Accept<V> for ast::Expression {
    fn accept(&self, v: &mut V) -> V::Output {
        match self {
            Self::Number(x) => v.visit_number(x),
            Self::Dice(x) => v.visit_dice(x),
            Self::Binary(x) => v.visit_binary(x),
            Self::List(x) => v.visit_list(x),
            Self::Sequence(x) => v.visit_sequence(x),
        }
    }
}
