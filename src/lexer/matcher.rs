use super::chars::CharMatcher;

/// Index of a state inside a [`StateGraph`].
pub type StateId = usize;

/// Recognises one kind of lexeme at a given input position.
#[derive(Debug, Clone)]
pub enum TokenMatcher {
    /// Exactly one character
    Char(CharMatcher),
    /// A fixed string
    Sequence(Vec<char>),
    /// Anything a small state graph can walk
    Complex(StateGraph),
}

impl TokenMatcher {
    pub fn sequence(text: &str) -> Self {
        TokenMatcher::Sequence(text.chars().collect())
    }

    /// Length of the longest lexeme starting at `input[0]`, 0 if none.
    pub fn longest_match(&self, input: &[char]) -> usize {
        match self {
            TokenMatcher::Char(matcher) => match input.first() {
                Some(&c) if matcher.is_match(c) => 1,
                _ => 0,
            },
            TokenMatcher::Sequence(expected) => {
                if input.starts_with(expected) {
                    expected.len()
                } else {
                    0
                }
            }
            TokenMatcher::Complex(graph) => graph.longest_match(input),
        }
    }
}

impl From<CharMatcher> for TokenMatcher {
    fn from(matcher: CharMatcher) -> Self {
        TokenMatcher::Char(matcher)
    }
}

impl From<StateGraph> for TokenMatcher {
    fn from(graph: StateGraph) -> Self {
        TokenMatcher::Complex(graph)
    }
}

#[derive(Debug, Clone)]
struct State {
    matcher: CharMatcher,
    next: Vec<StateId>,
    accepting: bool,
}

/// A directed graph of character predicates.
///
/// Each consumed character moves to a state whose predicate accepts it. The
/// walk keeps a single active state and always follows the first matching
/// edge in the order edges were added, so states with overlapping outgoing
/// predicates must list the edge that should win first.
#[derive(Debug, Clone)]
pub struct StateGraph {
    states: Vec<State>,
    starts: Vec<StateId>,
}

impl StateGraph {
    pub fn builder() -> GraphBuilder {
        GraphBuilder::default()
    }

    /// Walks greedily and returns the input length at the last accepting
    /// state visited.
    pub fn longest_match(&self, input: &[char]) -> usize {
        let Some(&first) = input.first() else {
            return 0;
        };
        let Some(mut current) = self.first_matching(&self.starts, first) else {
            return 0;
        };

        let mut consumed = 1;
        let mut best = if self.states[current].accepting { 1 } else { 0 };

        while let Some(&c) = input.get(consumed) {
            match self.first_matching(&self.states[current].next, c) {
                Some(next) => {
                    current = next;
                    consumed += 1;
                    if self.states[current].accepting {
                        best = consumed;
                    }
                }
                None => break,
            }
        }

        best
    }

    fn first_matching(&self, candidates: &[StateId], c: char) -> Option<StateId> {
        candidates
            .iter()
            .copied()
            .find(|&id| self.states[id].matcher.is_match(c))
    }
}

/// Builds a [`StateGraph`] state by state.
///
/// ```text
/// let mut g = StateGraph::builder();
/// let open = g.start(CharMatcher::single('<'));
/// let body = g.then(open, CharMatcher::name());
/// g.repeat(body);
/// let close = g.then(body, CharMatcher::single('>'));
/// g.accept(close);
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder {
    states: Vec<State>,
    starts: Vec<StateId>,
}

impl GraphBuilder {
    /// Adds a state with no edges.
    pub fn state(&mut self, matcher: CharMatcher) -> StateId {
        self.states.push(State {
            matcher,
            next: Vec::new(),
            accepting: false,
        });
        self.states.len() - 1
    }

    /// Adds a state the walk may begin in.
    pub fn start(&mut self, matcher: CharMatcher) -> StateId {
        let id = self.state(matcher);
        self.starts.push(id);
        id
    }

    /// Adds a state reachable from `from`.
    pub fn then(&mut self, from: StateId, matcher: CharMatcher) -> StateId {
        let id = self.state(matcher);
        self.edge(from, id);
        id
    }

    pub fn edge(&mut self, from: StateId, to: StateId) -> &mut Self {
        self.states[from].next.push(to);
        self
    }

    pub fn repeat(&mut self, id: StateId) -> &mut Self {
        self.edge(id, id)
    }

    pub fn accept(&mut self, id: StateId) -> &mut Self {
        self.states[id].accepting = true;
        self
    }

    pub fn build(self) -> StateGraph {
        StateGraph {
            states: self.states,
            starts: self.starts,
        }
    }
}
