pub mod link_prober;
