use anyhow::{Context, Result, bail};

const MAX_SEED_RANGE: u64 = 10_000;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse seed tokens: decimal, `0x`-prefixed hex, or an inclusive `a..=b` range.
pub fn resolve_seeds(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds = Vec::new();
    for token in tokens {
        if let Some((start, end)) = token.split_once("..=") {
            let start = parse_seed(start)?;
            let end = parse_seed(end)?;
            if end < start {
                bail!("seed range {token} is empty");
            }
            if end - start >= MAX_SEED_RANGE {
                bail!("seed range {token} spans more than {MAX_SEED_RANGE} seeds");
            }
            seeds.extend(start..=end);
        } else {
            seeds.push(parse_seed(token)?);
        }
    }
    if seeds.is_empty() {
        bail!("no seeds given");
    }
    seeds.dedup();
    Ok(seeds)
}

fn parse_seed(token: &str) -> Result<u64> {
    let token = token.trim();
    let parsed = match token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => token.parse(),
    };
    parsed.with_context(|| format!("invalid seed {token:?}"))
}
