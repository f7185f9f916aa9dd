use crate::core::{PoolListSnapshot, RouteGraph, RoutePath, RoutePool};
use solana_sdk::pubkey::Pubkey;
use std::collections::BTreeMap;

/// Direct pools and one-intermediate paths from `input` to `output`.
///
/// A pool joining `input` to some mint M lands in `in_pools` of M, a pool
/// joining M to `output` lands in `out_pools` of M. Only intermediates with
/// both legs are kept.
pub fn find_routes(input: &Pubkey, output: &Pubkey, pools: &PoolListSnapshot) -> RouteGraph {
    let mut direct_path = Vec::new();
    let mut paths: BTreeMap<Pubkey, RoutePath> = BTreeMap::new();

    if input == output {
        return RouteGraph::default();
    }

    for (kind, info) in pools.iter() {
        let pool = RoutePool { kind, info: *info };

        if info.connects(input, output) {
            direct_path.push(pool);
            continue;
        }

        if let Some(mid) = info.other_mint(input) {
            if mid != *input {
                paths.entry(mid).or_default().in_pools.push(pool);
            }
        } else if let Some(mid) = info.other_mint(output) {
            if mid != *output {
                paths.entry(mid).or_default().out_pools.push(pool);
            }
        }
    }

    paths.retain(|_, path| !path.in_pools.is_empty() && !path.out_pools.is_empty());

    RouteGraph {
        direct_path,
        route_path_dict: paths,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BasicPoolInfo, PoolKind};

    fn pool(a: Pubkey, b: Pubkey, version: u8) -> BasicPoolInfo {
        BasicPoolInfo {
            id: Pubkey::new_unique(),
            version,
            mint_a: a,
            mint_b: b,
        }
    }

    #[test]
    fn test_direct_pool_found_in_either_orientation() {
        let x = Pubkey::new_unique();
        let sol = Pubkey::new_unique();
        let snapshot = PoolListSnapshot {
            amm_pools: vec![pool(x, sol, 4)],
            cpmm_pools: vec![pool(sol, x, 7)],
            ..Default::default()
        };

        let routes = find_routes(&sol, &x, &snapshot);
        assert_eq!(routes.direct_path.len(), 2);
        assert!(routes.route_path_dict.is_empty());
        assert_eq!(routes.direct_path[0].kind, PoolKind::Amm);
        assert_eq!(routes.direct_path[1].kind, PoolKind::Cpmm);
    }

    #[test]
    fn test_two_hop_path_through_intermediate() {
        let x = Pubkey::new_unique();
        let usdc = Pubkey::new_unique();
        let sol = Pubkey::new_unique();
        let unrelated = Pubkey::new_unique();

        let leg_in = pool(x, usdc, 6);
        let leg_out = pool(usdc, sol, 4);
        let snapshot = PoolListSnapshot {
            amm_pools: vec![leg_out, pool(unrelated, sol, 4)],
            clmm_pools: vec![leg_in],
            ..Default::default()
        };

        let routes = find_routes(&x, &sol, &snapshot);
        assert!(routes.direct_path.is_empty());
        assert_eq!(routes.route_path_dict.len(), 1);

        let path = &routes.route_path_dict[&usdc];
        assert_eq!(path.in_pools[0].info, leg_in);
        assert_eq!(path.in_pools[0].kind, PoolKind::Clmm);
        assert_eq!(path.out_pools[0].info, leg_out);
        assert_eq!(routes.path_count(), 1);
    }

    #[test]
    fn test_no_route_when_disconnected() {
        let x = Pubkey::new_unique();
        let sol = Pubkey::new_unique();
        let snapshot = PoolListSnapshot {
            amm_pools: vec![pool(x, Pubkey::new_unique(), 4)],
            cpmm_pools: vec![pool(Pubkey::new_unique(), sol, 7)],
            ..Default::default()
        };

        assert!(find_routes(&x, &sol, &snapshot).is_empty());
        assert!(find_routes(&x, &x, &snapshot).is_empty());
    }

    #[test]
    fn test_pools_by_kind_deduplicates() {
        let x = Pubkey::new_unique();
        let sol = Pubkey::new_unique();
        let direct = pool(x, sol, 4);
        let snapshot = PoolListSnapshot {
            amm_pools: vec![direct],
            ..Default::default()
        };

        let routes = find_routes(&x, &sol, &snapshot);
        let grouped = routes.pools_by_kind();
        assert_eq!(grouped[&PoolKind::Amm], vec![direct.id]);
        assert!(!grouped.contains_key(&PoolKind::Clmm));
    }

    #[test]
    fn test_graph_pools_cover_direct_and_two_hop_legs() {
        let x = Pubkey::new_unique();
        let mid = Pubkey::new_unique();
        let sol = Pubkey::new_unique();
        let snapshot = PoolListSnapshot {
            amm_pools: vec![pool(x, sol, 4), pool(mid, sol, 4)],
            clmm_pools: vec![pool(x, mid, 6)],
            ..Default::default()
        };
        assert_eq!(snapshot.pools(PoolKind::Amm).len(), 2);
        assert_eq!(snapshot.pools(PoolKind::Cpmm).len(), 0);

        let routes = find_routes(&x, &sol, &snapshot);
        let ids: Vec<Pubkey> = routes.pools().map(|p| p.info.id).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[0], snapshot.amm_pools[0].id);
        assert!(ids.contains(&snapshot.clmm_pools[0].id));
        assert!(ids.contains(&snapshot.amm_pools[1].id));
    }
}
