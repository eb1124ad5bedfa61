use super::*;

enum Chain {
    Leaf(u32),
    Link(Box<Chain>, u32),
}

fn build_chain(depth: u32) -> Chain {
    let mut chain = Chain::Leaf(1);
    for i in 0..depth {
        chain = Chain::Link(Box::new(chain), i % 3);
    }
    chain
}

fn weigh(chain: &Chain) -> u64 {
    ensure_sufficient_stack(|| match chain {
        Chain::Leaf(w) => u64::from(*w),
        Chain::Link(inner, w) => weigh(inner) + u64::from(*w) + 1,
    })
}

fn dismantle(chain: Chain) {
    // Iterative drop: the default recursive drop would overflow.
    let mut current = chain;
    while let Chain::Link(inner, _) = current {
        current = *inner;
    }
}

#[test]
fn shallow_chain() {
    let chain = build_chain(3);
    // 1 + (0+1) + (1+1) + (2+1)
    assert_eq!(weigh(&chain), 7);
    dismantle(chain);
}

#[test]
fn deep_chain_does_not_overflow() {
    let chain = build_chain(200_000);
    let expected: u64 = 1 + (0..200_000u64).map(|i| i % 3 + 1).sum::<u64>();
    assert_eq!(weigh(&chain), expected);
    dismantle(chain);
}

#[test]
fn passes_results_through() {
    let result: Result<u32, &str> = ensure_sufficient_stack(|| Err("oversized"));
    assert_eq!(result, Err("oversized"));
}
