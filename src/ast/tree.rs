use crate::ast::Token;

/// A node of a parse tree produced by [`crate::grammar::Grammar`].
///
/// Rule nodes hold the children of exactly one matched alternative. Children
/// of hoisted sub-rules are spliced straight into the parent's list and
/// excluded tokens are simply missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseTree<T, R> {
    Token(Token<T>),
    Rule {
        rule: R,
        children: Vec<ParseTree<T, R>>,
    },
}

impl<T, R: Copy + PartialEq> ParseTree<T, R> {
    /// Rule type of a rule node, `None` for a token leaf.
    pub fn rule(&self) -> Option<R> {
        match self {
            ParseTree::Rule { rule, .. } => Some(*rule),
            ParseTree::Token(_) => None,
        }
    }

    pub fn children(&self) -> &[ParseTree<T, R>] {
        match self {
            ParseTree::Rule { children, .. } => children,
            ParseTree::Token(_) => &[],
        }
    }

    pub fn as_token(&self) -> Option<&Token<T>> {
        match self {
            ParseTree::Token(token) => Some(token),
            ParseTree::Rule { .. } => None,
        }
    }

    /// First direct child that is a node of the given rule.
    pub fn child(&self, rule: R) -> Option<&ParseTree<T, R>> {
        self.children().iter().find(|c| c.rule() == Some(rule))
    }

    /// Direct children that are nodes of the given rule.
    pub fn children_of(&self, rule: R) -> impl Iterator<Item = &ParseTree<T, R>> {
        self.children().iter().filter(move |c| c.rule() == Some(rule))
    }

    /// Every token leaf under this node, depth first, left to right.
    pub fn tokens(&self) -> Vec<&Token<T>> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a Token<T>>) {
        match self {
            ParseTree::Token(token) => out.push(token),
            ParseTree::Rule { children, .. } => {
                for child in children {
                    child.collect_tokens(out);
                }
            }
        }
    }

    /// First token leaf under this node.
    pub fn first_token(&self) -> Option<&Token<T>> {
        match self {
            ParseTree::Token(token) => Some(token),
            ParseTree::Rule { children, .. } => children.iter().find_map(|c| c.first_token()),
        }
    }
}
