// LR(0) item machinery, FIRST/FOLLOW computations, and SLR(1) action/goto
// table construction over integer-encoded grammars.
//
// A production is a `Vec<usize>` whose element 0 is the left-hand side and
// whose remaining elements are the right-hand side. Symbols below `n_nonterm`
// are nonterminals; symbol 0 is the augmented start symbol and production 0 is
// `Start -> S`.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

/// An LR(0) item: a production index and a dot position.
///
/// The dot indexes into the encoded production, so `dot == 1` means nothing
/// of the right-hand side has been recognized yet.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Item {
    pub prod: usize,
    pub dot: usize,
}

pub type ItemSet = BTreeSet<Item>;

/// Adds an item for every production of every nonterminal appearing right
/// after a dot, until nothing new is added.
pub fn closure(items: &ItemSet, prods: &[Vec<usize>], n_nonterm: usize) -> ItemSet {
    let mut c = items.clone();
    let mut work: Vec<Item> = c.iter().copied().collect();
    while let Some(item) = work.pop() {
        let Some(&sym) = prods[item.prod].get(item.dot) else {
            continue;
        };
        if sym >= n_nonterm {
            continue;
        }
        for (j, p) in prods.iter().enumerate() {
            if p[0] == sym {
                let new_item = Item { prod: j, dot: 1 };
                if c.insert(new_item) {
                    work.push(new_item);
                }
            }
        }
    }
    c
}

/// Advances every item whose dot precedes `sym` and closes the result.
pub fn goto(items: &ItemSet, sym: usize, prods: &[Vec<usize>], n_nonterm: usize) -> ItemSet {
    let moved: ItemSet = items
        .iter()
        .filter(|item| prods[item.prod].get(item.dot) == Some(&sym))
        .map(|item| Item {
            prod: item.prod,
            dot: item.dot + 1,
        })
        .collect();
    closure(&moved, prods, n_nonterm)
}

/// The canonical collection of LR(0) item sets, in discovery order, together
/// with the transition on every symbol. State 0 is the closure of
/// `Start -> . S`.
#[derive(Debug, Default)]
pub struct Collection {
    pub states: Vec<ItemSet>,
    pub transitions: Vec<BTreeMap<usize, usize>>,
}

pub fn construct_collection(prods: &[Vec<usize>], n_nonterm: usize, n_term: usize) -> Collection {
    let mut index: BTreeMap<ItemSet, usize> = BTreeMap::new();
    let mut coll = Collection::default();

    let start = closure(&ItemSet::from([Item { prod: 0, dot: 1 }]), prods, n_nonterm);
    index.insert(start.clone(), 0);
    coll.states.push(start);
    coll.transitions.push(BTreeMap::new());

    let mut next = 0;
    while next < coll.states.len() {
        for sym in 0..(n_nonterm + n_term) {
            let nxt = goto(&coll.states[next], sym, prods, n_nonterm);
            if nxt.is_empty() {
                continue;
            }
            let target = match index.get(&nxt) {
                Some(&i) => i,
                None => {
                    let i = coll.states.len();
                    index.insert(nxt.clone(), i);
                    coll.states.push(nxt);
                    coll.transitions.push(BTreeMap::new());
                    i
                }
            };
            coll.transitions[next].insert(sym, target);
        }
        next += 1;
    }
    coll
}

/// Computes FIRST sets and nullability for all grammar symbols.
pub fn first_sets(
    prods: &[Vec<usize>],
    n_nonterm: usize,
    n_term: usize,
) -> (Vec<BTreeSet<usize>>, Vec<bool>) {
    let n_sym = n_nonterm + n_term;
    let mut first: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n_sym];
    let mut nullable = vec![false; n_sym];
    for t in n_nonterm..n_sym {
        first[t].insert(t);
    }
    let mut changed = true;
    while changed {
        changed = false;
        for prod in prods {
            let lhs = prod[0];
            let mut all_nullable = true;
            for &sym in &prod[1..] {
                let first_sym = first[sym].clone();
                for f in first_sym {
                    changed |= first[lhs].insert(f);
                }
                if !nullable[sym] {
                    all_nullable = false;
                    break;
                }
            }
            if all_nullable && !nullable[lhs] {
                nullable[lhs] = true;
                changed = true;
            }
        }
    }
    (first, nullable)
}

/// Computes FOLLOW sets for all nonterminals; `eos` is placed in the FOLLOW
/// set of the start symbol.
pub fn follow_sets(
    prods: &[Vec<usize>],
    n_nonterm: usize,
    eos: usize,
    first: &[BTreeSet<usize>],
    nullable: &[bool],
) -> Vec<BTreeSet<usize>> {
    let mut follow: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n_nonterm];
    follow[0].insert(eos);
    let mut changed = true;
    while changed {
        changed = false;
        for prod in prods {
            let lhs = prod[0];
            let rhs = &prod[1..];
            for (i, &b) in rhs.iter().enumerate() {
                if b >= n_nonterm {
                    continue;
                }
                let mut beta_nullable = true;
                for &sym in &rhs[i + 1..] {
                    let first_sym = first[sym].clone();
                    for f in first_sym {
                        changed |= follow[b].insert(f);
                    }
                    if !nullable[sym] {
                        beta_nullable = false;
                        break;
                    }
                }
                if beta_nullable {
                    let follow_lhs = follow[lhs].clone();
                    for f in follow_lhs {
                        changed |= follow[b].insert(f);
                    }
                }
            }
        }
    }
    follow
}

/// One cell of the SLR(1) table before conflicts are checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Act {
    Accept,
    Shift(usize),
    Reduce(usize),
    Goto(usize),
}

pub type Tab = Vec<Vec<BTreeSet<Act>>>;

/// Fills shift/goto entries from the collection's transitions, reduce entries
/// from FOLLOW sets, and accept on `eos` for the completed start production.
pub fn construct_slr(
    coll: &Collection,
    flw: &[BTreeSet<usize>],
    prods: &[Vec<usize>],
    n_nonterm: usize,
    n_term: usize,
    eos: usize,
) -> Tab {
    let mut tab: Tab = vec![vec![BTreeSet::new(); n_nonterm + n_term]; coll.states.len()];

    for (state, trans) in coll.transitions.iter().enumerate() {
        for (&sym, &target) in trans {
            let act = if sym < n_nonterm {
                Act::Goto(target)
            } else {
                Act::Shift(target)
            };
            tab[state][sym].insert(act);
        }
    }

    for (state, items) in coll.states.iter().enumerate() {
        for item in items {
            let p = &prods[item.prod];
            if item.dot != p.len() {
                continue;
            }
            if item.prod == 0 {
                tab[state][eos].insert(Act::Accept);
            } else {
                for &t in &flw[p[0]] {
                    tab[state][t].insert(Act::Reduce(item.prod));
                }
            }
        }
    }
    tab
}

/// Writes the productions, one per line: `P,<index>,<LHS> -> <RHS>`.
pub fn write_prods<W: Write>(out: &mut W, prods: &[Vec<usize>], names: &[&str]) -> io::Result<()> {
    writeln!(out, "PS,{}\n", prods.len())?;
    for (i, prod) in prods.iter().enumerate() {
        write!(out, "P,{},{} ->", i, names[prod[0]])?;
        for &t in &prod[1..] {
            write!(out, " {}", names[t])?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Writes every item set with a `.` marking the dot.
pub fn write_states<W: Write>(
    out: &mut W,
    coll: &Collection,
    prods: &[Vec<usize>],
    names: &[&str],
) -> io::Result<()> {
    writeln!(out, "CS,{}\n", coll.states.len())?;
    for (i, state) in coll.states.iter().enumerate() {
        for item in state {
            let p = &prods[item.prod];
            write!(out, "C,{},{} ->", i, names[p[0]])?;
            for (j, &t) in p.iter().enumerate().skip(1) {
                if j == item.dot {
                    write!(out, " .")?;
                }
                write!(out, " {}", names[t])?;
            }
            if item.dot == p.len() {
                write!(out, " .")?;
            }
            writeln!(out)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Writes FIRST sets (when `nullable` is given) or FOLLOW sets.
pub fn write_fstflw<W: Write>(
    out: &mut W,
    sets: &[BTreeSet<usize>],
    nullable: Option<&[bool]>,
    names: &[&str],
) -> io::Result<()> {
    let label = if nullable.is_some() { "FIRST" } else { "FOLLOW" };
    for (sym, set) in sets.iter().enumerate() {
        write!(out, "{},{},{{", label, names[sym])?;
        let mut members: Vec<&str> = Vec::new();
        if nullable.is_some_and(|n| n[sym]) {
            members.push("`empty'");
        }
        members.extend(set.iter().map(|&t| names[t]));
        write!(out, "{}", members.join(", "))?;
        writeln!(out, "}}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Start -> E ; E -> E + n | n ; terminals: + n $
    const N_NONTERM: usize = 2;
    const N_TERM: usize = 3;
    const PLUS: usize = 2;
    const NUM: usize = 3;
    const EOS: usize = 4;

    fn prods() -> Vec<Vec<usize>> {
        vec![vec![0, 1], vec![1, 1, PLUS, NUM], vec![1, NUM]]
    }

    #[test]
    fn closure_adds_productions_of_leading_nonterminal() {
        let c = closure(&ItemSet::from([Item { prod: 0, dot: 1 }]), &prods(), N_NONTERM);
        assert_eq!(c.len(), 3);
        assert!(c.contains(&Item { prod: 1, dot: 1 }));
        assert!(c.contains(&Item { prod: 2, dot: 1 }));
    }

    #[test]
    fn goto_advances_dot() {
        let c = closure(&ItemSet::from([Item { prod: 0, dot: 1 }]), &prods(), N_NONTERM);
        let g = goto(&c, NUM, &prods(), N_NONTERM);
        assert_eq!(g, ItemSet::from([Item { prod: 2, dot: 2 }]));
    }

    #[test]
    fn first_and_follow() {
        let p = prods();
        let (first, nullable) = first_sets(&p, N_NONTERM, N_TERM);
        assert_eq!(first[1], BTreeSet::from([NUM]));
        assert!(!nullable[1]);
        let follow = follow_sets(&p, N_NONTERM, EOS, &first, &nullable);
        assert_eq!(follow[1], BTreeSet::from([PLUS, EOS]));
    }

    #[test]
    fn epsilon_production_is_nullable() {
        // Start -> A ; A -> (empty) | n
        let p = vec![vec![0, 1], vec![1], vec![1, NUM]];
        let (_, nullable) = first_sets(&p, N_NONTERM, N_TERM);
        assert!(nullable[1]);
        assert!(nullable[0]);
    }

    #[test]
    fn slr_table_has_no_conflicts_for_left_recursion() {
        let p = prods();
        let coll = construct_collection(&p, N_NONTERM, N_TERM);
        let (first, nullable) = first_sets(&p, N_NONTERM, N_TERM);
        let follow = follow_sets(&p, N_NONTERM, EOS, &first, &nullable);
        let tab = construct_slr(&coll, &follow, &p, N_NONTERM, N_TERM, EOS);
        assert_eq!(tab.len(), coll.states.len());
        assert!(tab.iter().flatten().all(|cell| cell.len() <= 1));
        assert!(tab.iter().flatten().any(|cell| cell.contains(&Act::Accept)));
        assert!(matches!(
            tab[0][1].iter().next(),
            Some(Act::Goto(_))
        ));
    }

    #[test]
    fn ambiguous_grammar_produces_conflict() {
        // Start -> E ; E -> E + E | n
        let p = vec![vec![0, 1], vec![1, 1, PLUS, 1], vec![1, NUM]];
        let coll = construct_collection(&p, N_NONTERM, N_TERM);
        let (first, nullable) = first_sets(&p, N_NONTERM, N_TERM);
        let follow = follow_sets(&p, N_NONTERM, EOS, &first, &nullable);
        let tab = construct_slr(&coll, &follow, &p, N_NONTERM, N_TERM, EOS);
        assert!(tab.iter().flatten().any(|cell| cell.len() >= 2));
    }

    #[test]
    fn dumps_are_readable() {
        let p = prods();
        let names = ["Start", "E", "+", "n", "end"];
        let mut out = Vec::new();
        write_prods(&mut out, &p, &names).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("P,1,E -> E + n"));

        let coll = construct_collection(&p, N_NONTERM, N_TERM);
        let mut out = Vec::new();
        write_states(&mut out, &coll, &p, &names).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("C,0,Start -> . E"));
    }
}
